use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{NodeId, QueryTree, QueryTreeResult, TreeNode},
    types::DataType,
};

impl QueryTree {
    /// Convert the subtree at `id` back into syntax.
    pub fn to_ast(&self, id: NodeId, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        self.get(id)?.to_ast_impl(self, options)
    }

    /// Result type of `id`; for lambdas, the type of the body.
    pub fn result_type(&self, id: NodeId) -> QueryTreeResult<Option<DataType>> {
        let node = self.get(id)?;
        match node.as_lambda() {
            Some(lambda) => match lambda.expression() {
                Some(expression) => self.result_type(expression),
                None => Ok(None),
            },
            None => Ok(node.result_type()),
        }
    }
}

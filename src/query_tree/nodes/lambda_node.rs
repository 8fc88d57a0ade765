use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeError, QueryTreeResult, TreeHashState, TreeNode},
    types::DataType,
};

const ARGUMENTS_CHILD_INDEX: usize = 0;
const EXPRESSION_CHILD_INDEX: usize = 1;
const CHILDREN_SIZE: usize = EXPRESSION_CHILD_INDEX + 1;

/// Lambda such as `x -> x + 1`.
///
/// Argument columns and columns in the body that read an argument use the
/// lambda itself as column source, so a lambda is built empty and its
/// arguments list and body are attached afterwards with `QueryTree::set_child`.
#[derive(Debug, Clone)]
pub struct LambdaNode {
    argument_names: Vec<String>,
    children: [Option<NodeId>; CHILDREN_SIZE],
}

impl LambdaNode {
    pub const ARGUMENTS_CHILD_INDEX: usize = ARGUMENTS_CHILD_INDEX;
    pub const EXPRESSION_CHILD_INDEX: usize = EXPRESSION_CHILD_INDEX;

    pub fn new<I, S>(argument_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argument_names: argument_names.into_iter().map(Into::into).collect(),
            children: [None, None],
        }
    }

    pub fn argument_names(&self) -> &[String] {
        &self.argument_names
    }

    pub fn arguments(&self) -> Option<NodeId> {
        self.children[ARGUMENTS_CHILD_INDEX]
    }

    pub fn expression(&self) -> Option<NodeId> {
        self.children[EXPRESSION_CHILD_INDEX]
    }

    pub fn expression_or_err(&self) -> QueryTreeResult<NodeId> {
        self.children[EXPRESSION_CHILD_INDEX]
            .ok_or_else(|| QueryTreeError::logical("Lambda expression is not initialized"))
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for LambdaNode {
    fn node_type(&self) -> NodeType {
        NodeType::Lambda
    }

    fn name(&self) -> String {
        format!("lambda({})", self.argument_names.join(", "))
    }

    /// Known only through the body, see `QueryTree::result_type`.
    fn result_type(&self) -> Option<DataType> {
        None
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.argument_names == rhs.argument_names
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update(&self.argument_names.len());
        for name in &self.argument_names {
            state.update_str(name);
        }
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        buffer.push_str(&format!(
            "{}LAMBDA id: {}, arguments: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.argument_names.join(", ")
        ));
        if let Some(arguments) = self.arguments() {
            buffer.push_str(&format!("\n{}ARGUMENTS\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(arguments, buffer, state, indent + 4)?;
        }
        if let Some(expression) = self.expression() {
            buffer.push_str(&format!("\n{}EXPRESSION\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(expression, buffer, state, indent + 4)?;
        }
        Ok(())
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        let body = tree.to_ast(self.expression_or_err()?, options)?;
        Ok(AstNode::Lambda { arguments: self.argument_names.clone(), body: Box::new(body) })
    }
}

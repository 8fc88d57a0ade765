use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeError, QueryTreeResult, TreeHashState, TreeNode},
    types::DataType,
};

const TABLE_EXPRESSION_CHILD_INDEX: usize = 0;
const JOIN_EXPRESSIONS_CHILD_INDEX: usize = 1;
const CHILDREN_SIZE: usize = JOIN_EXPRESSIONS_CHILD_INDEX + 1;

/// `ARRAY JOIN` over a table expression.
///
/// Join expressions are column nodes holding the array expression, with the
/// array join node as their column source. Attach them with
/// `QueryTree::set_child` once the node exists.
#[derive(Debug, Clone)]
pub struct ArrayJoinNode {
    is_left: bool,
    children: [Option<NodeId>; CHILDREN_SIZE],
}

impl ArrayJoinNode {
    pub const TABLE_EXPRESSION_CHILD_INDEX: usize = TABLE_EXPRESSION_CHILD_INDEX;
    pub const JOIN_EXPRESSIONS_CHILD_INDEX: usize = JOIN_EXPRESSIONS_CHILD_INDEX;

    pub fn new(table_expression: NodeId, is_left: bool) -> Self {
        Self {
            is_left,
            children: [Some(table_expression), None],
        }
    }

    pub fn is_left(&self) -> bool {
        self.is_left
    }

    pub fn table_expression(&self) -> Option<NodeId> {
        self.children[TABLE_EXPRESSION_CHILD_INDEX]
    }

    pub fn join_expressions(&self) -> Option<NodeId> {
        self.children[JOIN_EXPRESSIONS_CHILD_INDEX]
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for ArrayJoinNode {
    fn node_type(&self) -> NodeType {
        NodeType::ArrayJoin
    }

    fn name(&self) -> String {
        if self.is_left { "LEFT ARRAY JOIN".to_string() } else { "ARRAY JOIN".to_string() }
    }

    fn result_type(&self) -> Option<DataType> {
        None
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.is_left == rhs.is_left
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update(&self.is_left);
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
            "{}ARRAY_JOIN id: {}, is_left: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.is_left
        ));
        if let Some(table_expression) = self.table_expression() {
            buffer.push_str(&format!("\n{}TABLE EXPRESSION\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(table_expression, buffer, state, indent + 4)?;
        }
        if let Some(join_expressions) = self.join_expressions() {
            buffer.push_str(&format!("\n{}JOIN EXPRESSIONS\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(join_expressions, buffer, state, indent + 4)?;
        }
        Ok(())
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        let table_expression = self
            .table_expression()
            .ok_or_else(|| QueryTreeError::logical("Array join table expression is not initialized"))?;
        let join_expressions = self
            .join_expressions()
            .ok_or_else(|| QueryTreeError::logical("Array join expressions are not initialized"))?;

        let mut expressions = Vec::new();
        for item in tree.list(join_expressions)?.items() {
            let expression = match tree.get(item)?.as_column() {
                Some(column) if column.has_expression() => {
                    AstNode::alias(tree.to_ast(column.expression_or_err()?, options)?, column.column_name())
                }
                _ => tree.to_ast(item, options)?,
            };
            expressions.push(expression);
        }

        Ok(AstNode::ArrayJoin {
            table_expression: Box::new(tree.to_ast(table_expression, options)?),
            is_left: self.is_left,
            expressions,
        })
    }
}

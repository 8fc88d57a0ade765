use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeResult, TreeHashState, TreeNode},
    types::DataType,
};

/// Ordered list of nodes, e.g. function arguments or lambda arguments.
///
/// The number of items is fixed when the list is built.
#[derive(Debug, Clone)]
pub struct ListNode {
    children: Vec<Option<NodeId>>,
}

impl ListNode {
    pub fn new(items: impl IntoIterator<Item = NodeId>) -> Self {
        Self { children: items.into_iter().map(Some).collect() }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for ListNode {
    fn node_type(&self) -> NodeType {
        NodeType::List
    }

    /// Lists have no name of their own.
    fn name(&self) -> String {
        String::new()
    }

    fn result_type(&self) -> Option<DataType> {
        None
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, _rhs: &Self) -> bool {
        true
    }

    fn update_tree_hash_impl(&self, _state: &mut TreeHashState) {}

    fn dump_tree_impl(
        &self,
        id: NodeId,
        tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        buffer.push_str(&format!(
            "{}LIST id: {}, nodes: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.children.len()
        ));
        for item in self.items() {
            buffer.push('\n');
            tree.dump_tree_into(item, buffer, state, indent + 2)?;
        }
        Ok(())
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        let items = self
            .items()
            .map(|item| tree.to_ast(item, options))
            .collect::<QueryTreeResult<Vec<_>>>()?;
        Ok(AstNode::ExpressionList(items))
    }
}

use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeResult, TreeHashState, TreeNode},
    types::{DataType, Literal},
};

/// Constant value with its type.
#[derive(Debug, Clone)]
pub struct ConstantNode {
    value: Literal,
    value_type: DataType,
    children: [Option<NodeId>; 0],
}

impl ConstantNode {
    /// Constant typed after its literal.
    pub fn new(value: Literal) -> Self {
        let value_type = DataType::of_literal(&value);
        Self::with_type(value, value_type)
    }

    pub fn with_type(value: Literal, value_type: DataType) -> Self {
        Self { value, value_type, children: [] }
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }

    pub fn value_type(&self) -> &DataType {
        &self.value_type
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for ConstantNode {
    fn node_type(&self) -> NodeType {
        NodeType::Constant
    }

    fn name(&self) -> String {
        self.value.to_string()
    }

    fn result_type(&self) -> Option<DataType> {
        Some(self.value_type.clone())
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.value == rhs.value && self.value_type == rhs.value_type
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update(&self.value);
        state.update(&self.value_type);
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        _tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        buffer.push_str(&format!(
            "{}CONSTANT id: {}, constant_value: {}, constant_value_type: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.value,
            self.value_type
        ));
        Ok(())
    }

    fn to_ast_impl(&self, _tree: &QueryTree, _options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        Ok(AstNode::Literal(self.value.clone()))
    }
}

use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeResult, TreeHashState, TreeNode},
    types::DataType,
};

const ARGUMENTS_CHILD_INDEX: usize = 0;
const CHILDREN_SIZE: usize = ARGUMENTS_CHILD_INDEX + 1;

/// Function call. Arguments live in a list node held in the single child slot.
#[derive(Debug, Clone)]
pub struct FunctionNode {
    function_name: String,
    result_type: Option<DataType>,
    children: [Option<NodeId>; CHILDREN_SIZE],
}

impl FunctionNode {
    pub const ARGUMENTS_CHILD_INDEX: usize = ARGUMENTS_CHILD_INDEX;

    pub fn new(function_name: impl Into<String>, arguments: NodeId) -> Self {
        Self {
            function_name: function_name.into(),
            result_type: None,
            children: [Some(arguments)],
        }
    }

    pub fn with_result_type(mut self, result_type: DataType) -> Self {
        self.result_type = Some(result_type);
        self
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn set_result_type(&mut self, result_type: Option<DataType>) {
        self.result_type = result_type;
    }

    pub fn arguments(&self) -> Option<NodeId> {
        self.children[ARGUMENTS_CHILD_INDEX]
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for FunctionNode {
    fn node_type(&self) -> NodeType {
        NodeType::Function
    }

    fn name(&self) -> String {
        self.function_name.clone()
    }

    fn result_type(&self) -> Option<DataType> {
        self.result_type.clone()
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.function_name == rhs.function_name && self.result_type == rhs.result_type
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update_str(&self.function_name);
        state.update(&self.result_type);
    }

    fn validate(&self, tree: &QueryTree) -> QueryTreeResult<()> {
        if let Some(arguments) = self.arguments() {
            tree.list(arguments)?;
        }
        Ok(())
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
            "{}FUNCTION id: {}, function_name: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.function_name
        ));
        if let Some(result_type) = &self.result_type {
            buffer.push_str(&format!(", result_type: {}", result_type));
        }
        if let Some(arguments) = self.arguments() {
            buffer.push_str(&format!("\n{}ARGUMENTS\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(arguments, buffer, state, indent + 4)?;
        }
        Ok(())
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        let arguments = match self.arguments() {
            Some(arguments) => tree
                .list(arguments)?
                .items()
                .map(|argument| tree.to_ast(argument, options))
                .collect::<QueryTreeResult<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(AstNode::Function { name: self.function_name.clone(), arguments })
    }
}

use crate::{
    ast::{AstNode, ConvertToAstOptions},
    query_tree::{
        ArrayJoinNode, ColumnNode, ConstantNode, FormatState, FunctionNode, LambdaNode, ListNode, NodeId, NodeType,
        QueryTree, QueryTreeResult, TableNode, TreeHashState, WeakNodeRef,
    },
    types::DataType,
};

/// Contract every query tree node variant implements.
///
/// Methods only see the node's own state. Walking children and weak
/// references is done by the drivers on [`QueryTree`] (`is_equal`,
/// `tree_hash`, `clone_subtree`, `dump_tree`, `to_ast`), which call back into
/// these methods for each node.
pub trait TreeNode {
    fn node_type(&self) -> NodeType;

    /// Semantic name, used in diagnostics and default display.
    fn name(&self) -> String;

    /// `None` until type inference knows the type.
    fn result_type(&self) -> Option<DataType>;

    /// Owned child slots. The slot count is fixed for the node's lifetime.
    fn children(&self) -> &[Option<NodeId>];

    /// Non-owning references this node holds.
    fn weak_pointers(&self) -> &[WeakNodeRef] {
        &[]
    }

    /// Slots the clone driver repoints after a deep copy.
    fn weak_pointers_mut(&mut self) -> &mut [WeakNodeRef] {
        &mut []
    }

    /// Compare node local state. Children and weak references are compared by
    /// the caller. Node type is already known to match.
    fn is_equal_impl(&self, rhs: &Self) -> bool;

    /// Hash exactly the state `is_equal_impl` compares.
    fn update_tree_hash_impl(&self, state: &mut TreeHashState);

    /// Check construction invariants before the node enters `tree`.
    fn validate(&self, _tree: &QueryTree) -> QueryTreeResult<()> {
        Ok(())
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()>;

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode>;
}

/// Closed set of node variants stored in a [`QueryTree`].
#[derive(Debug, Clone)]
pub enum QueryTreeNode {
    Column(ColumnNode),
    Constant(ConstantNode),
    Function(FunctionNode),
    List(ListNode),
    Lambda(LambdaNode),
    Table(TableNode),
    ArrayJoin(ArrayJoinNode),
}

macro_rules! dispatch {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            QueryTreeNode::Column($inner) => $body,
            QueryTreeNode::Constant($inner) => $body,
            QueryTreeNode::Function($inner) => $body,
            QueryTreeNode::List($inner) => $body,
            QueryTreeNode::Lambda($inner) => $body,
            QueryTreeNode::Table($inner) => $body,
            QueryTreeNode::ArrayJoin($inner) => $body,
        }
    };
}

macro_rules! variant_accessors {
    ($($variant:ident($ty:ty), $as_ref:ident, $as_mut:ident;)*) => {
        impl QueryTreeNode {
            $(
                pub fn $as_ref(&self) -> Option<&$ty> {
                    match self {
                        QueryTreeNode::$variant(node) => Some(node),
                        _ => None,
                    }
                }

                pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        QueryTreeNode::$variant(node) => Some(node),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<$ty> for QueryTreeNode {
                fn from(node: $ty) -> Self {
                    QueryTreeNode::$variant(node)
                }
            }
        )*
    };
}

variant_accessors! {
    Column(ColumnNode), as_column, as_column_mut;
    Constant(ConstantNode), as_constant, as_constant_mut;
    Function(FunctionNode), as_function, as_function_mut;
    List(ListNode), as_list, as_list_mut;
    Lambda(LambdaNode), as_lambda, as_lambda_mut;
    Table(TableNode), as_table, as_table_mut;
    ArrayJoin(ArrayJoinNode), as_array_join, as_array_join_mut;
}

impl QueryTreeNode {
    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        dispatch!(self, node => node.children_mut())
    }

    /// Copy of the node local state with every child slot emptied. The clone
    /// driver fills the slots with the copied children.
    pub(crate) fn clone_impl(&self) -> QueryTreeNode {
        let mut node = self.clone();
        node.children_mut().iter_mut().for_each(|child| *child = None);
        node
    }
}

impl TreeNode for QueryTreeNode {
    fn node_type(&self) -> NodeType {
        dispatch!(self, node => node.node_type())
    }

    fn name(&self) -> String {
        dispatch!(self, node => node.name())
    }

    fn result_type(&self) -> Option<DataType> {
        dispatch!(self, node => node.result_type())
    }

    fn children(&self) -> &[Option<NodeId>] {
        dispatch!(self, node => node.children())
    }

    fn weak_pointers(&self) -> &[WeakNodeRef] {
        dispatch!(self, node => node.weak_pointers())
    }

    fn weak_pointers_mut(&mut self) -> &mut [WeakNodeRef] {
        dispatch!(self, node => node.weak_pointers_mut())
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        match (self, rhs) {
            (QueryTreeNode::Column(lhs), QueryTreeNode::Column(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::Constant(lhs), QueryTreeNode::Constant(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::Function(lhs), QueryTreeNode::Function(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::List(lhs), QueryTreeNode::List(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::Lambda(lhs), QueryTreeNode::Lambda(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::Table(lhs), QueryTreeNode::Table(rhs)) => lhs.is_equal_impl(rhs),
            (QueryTreeNode::ArrayJoin(lhs), QueryTreeNode::ArrayJoin(rhs)) => lhs.is_equal_impl(rhs),
            _ => false,
        }
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        dispatch!(self, node => node.update_tree_hash_impl(state))
    }

    fn validate(&self, tree: &QueryTree) -> QueryTreeResult<()> {
        dispatch!(self, node => node.validate(tree))
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        dispatch!(self, node => node.dump_tree_impl(id, tree, buffer, state, indent))
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        dispatch!(self, node => node.to_ast_impl(tree, options))
    }
}

pub mod types;
pub use types::{DataType, Literal, NameAndTypePair};

pub mod ast;
pub use ast::{AstNode, ConvertToAstOptions, Identifier};

pub mod query_tree;
pub use query_tree::{
    ColumnNode, NodeId, NodeType, QueryTree, QueryTreeError, QueryTreeNode, QueryTreeResult, TreeNode, WeakNodeRef,
};

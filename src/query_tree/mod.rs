pub mod query_tree_error;
pub use query_tree_error::*;

pub mod node_id;
pub use node_id::*;

pub mod node_type;
pub use node_type::*;

pub mod tree_hash;
pub use tree_hash::*;

pub mod tree_node;
pub use tree_node::*;

pub mod arena;
pub use arena::*;

pub mod equality;

pub mod clone;
pub use clone::*;

pub mod dump;
pub use dump::*;

pub mod convert;

pub mod nodes;
pub use nodes::*;

#[cfg(test)]
mod _tests;

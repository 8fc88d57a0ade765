pub mod identifier;
pub use identifier::*;

pub mod ast_node;
pub use ast_node::*;

pub mod convert_options;
pub use convert_options::*;

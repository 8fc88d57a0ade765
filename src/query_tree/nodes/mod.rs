pub mod column_node;
pub use column_node::*;

pub mod constant_node;
pub use constant_node::*;

pub mod function_node;
pub use function_node::*;

pub mod list_node;
pub use list_node::*;

pub mod lambda_node;
pub use lambda_node::*;

pub mod table_node;
pub use table_node::*;

pub mod array_join_node;
pub use array_join_node::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying a query tree node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Column,
    Constant,
    Function,
    List,
    Lambda,
    Table,
    ArrayJoin,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Column => "COLUMN",
            NodeType::Constant => "CONSTANT",
            NodeType::Function => "FUNCTION",
            NodeType::List => "LIST",
            NodeType::Lambda => "LAMBDA",
            NodeType::Table => "TABLE",
            NodeType::ArrayJoin => "ARRAY_JOIN",
        }
    }

    /// Seed mixed into the tree hash before a node's own fields, so two
    /// variants with identical field values still hash apart.
    pub fn hash_seed(&self) -> u64 {
        match self {
            NodeType::Column => 0x636f_6c75_6d6e_0001,
            NodeType::Constant => 0x636f_6e73_7400_0002,
            NodeType::Function => 0x6675_6e63_7400_0003,
            NodeType::List => 0x6c69_7374_0000_0004,
            NodeType::Lambda => 0x6c61_6d62_6461_0005,
            NodeType::Table => 0x7461_626c_6500_0006,
            NodeType::ArrayJoin => 0x6172_726a_6f69_0007,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

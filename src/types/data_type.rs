use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Literal;

/// Value type produced by a query tree node.
///
/// Types compare structurally: `Array(Int32)` equals any other
/// `Array(Int32)`. Tree equality and hashing rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of the NULL literal
    Nothing,
    Bool,
    Int32,
    Int64,
    UInt64,
    Float64,
    String,
    Array(Box<DataType>),
    Nullable(Box<DataType>),
}

impl DataType {
    pub fn array(nested: DataType) -> DataType {
        DataType::Array(Box::new(nested))
    }

    /// Wrap in `Nullable`, unless the type already accepts NULL.
    pub fn nullable(nested: DataType) -> DataType {
        match nested {
            DataType::Nullable(_) | DataType::Nothing => nested,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    /// Type of a constant literal.
    pub fn of_literal(literal: &Literal) -> DataType {
        match literal {
            Literal::Null => DataType::Nothing,
            Literal::Bool(_) => DataType::Bool,
            Literal::Int(value) => {
                if i32::try_from(*value).is_ok() {
                    DataType::Int32
                } else {
                    DataType::Int64
                }
            }
            Literal::Float(_) => DataType::Float64,
            Literal::String(_) => DataType::String,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Nothing => write!(f, "Nothing"),
            DataType::Bool => write!(f, "Bool"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Int64 => write!(f, "Int64"),
            DataType::UInt64 => write!(f, "UInt64"),
            DataType::Float64 => write!(f, "Float64"),
            DataType::String => write!(f, "String"),
            DataType::Array(nested) => write!(f, "Array({})", nested),
            DataType::Nullable(nested) => write!(f, "Nullable({})", nested),
        }
    }
}

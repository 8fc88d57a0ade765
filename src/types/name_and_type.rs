use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Column name with its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameAndTypePair {
    pub name: String,
    pub ty: DataType,
}

impl NameAndTypePair {
    pub fn new(name: impl Into<String>, ty: DataType) -> Self {
        Self { name: name.into(), ty }
    }
}

impl fmt::Display for NameAndTypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)
    }
}

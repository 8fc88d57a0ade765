use ordered_float::NotNan;
use std::fmt::{self, Display};

/// Constant value held by a constant node.
///
/// Floats are wrapped in `NotNan` so literals are `Eq + Hash`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(NotNan<f64>),
    Bool(bool),
    Null,
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(n) => write!(f, "{}", n.into_inner()),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "NULL"),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(_) => write!(f, "String({})", self),
            Literal::Int(_) => write!(f, "Int({})", self),
            Literal::Float(_) => write!(f, "Float({})", self),
            Literal::Bool(_) => write!(f, "Bool({})", self),
            Literal::Null => write!(f, "Null(NULL)"),
        }
    }
}

use std::fmt::Display;

/// Errors raised by the query tree.
///
/// Every failure at this layer is a broken internal contract (a missing
/// expression, a dangling column source, a clone that lost track of a node).
/// User facing diagnostics are produced before nodes are built.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTreeError {
    LogicalError(String),
}

pub type QueryTreeResult<T> = Result<T, QueryTreeError>;

impl QueryTreeError {
    pub fn logical(message: impl Into<String>) -> Self {
        QueryTreeError::LogicalError(message.into())
    }

    pub fn err<T>(self) -> QueryTreeResult<T> {
        Err(self)
    }

    pub fn message(&self) -> &str {
        match self {
            QueryTreeError::LogicalError(message) => message,
        }
    }
}

impl Display for QueryTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryTreeError::LogicalError(message) => write!(f, "LogicalError: {}", message),
        }
    }
}

impl std::error::Error for QueryTreeError {}

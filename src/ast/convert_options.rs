use serde::{Deserialize, Serialize};

/// Options for converting a query tree back into syntax.
///
/// - `fully_qualified_identifiers` prefixes columns read from a table with the
///   table alias or name when no display identifier is set.
/// - `qualify_with_database` also adds the database when a table name is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertToAstOptions {
    /// Qualify columns with their source table
    pub fully_qualified_identifiers: bool,
    /// Include the database in table qualification
    pub qualify_with_database: bool,
}

impl ConvertToAstOptions {
    /// Create default options: bare column names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: qualify columns with their table.
    pub fn fully_qualified() -> Self {
        Self {
            fully_qualified_identifiers: true,
            qualify_with_database: false,
        }
    }

    /// Convenience: qualify columns with database and table.
    pub fn with_database() -> Self {
        Self {
            fully_qualified_identifiers: true,
            qualify_with_database: true,
        }
    }
}

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLAIN_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Compound identifier such as `db.table.column`, stored as its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    parts: Vec<String>,
}

impl Identifier {
    /// Split a dotted name into parts. An empty string gives an empty identifier.
    pub fn new(full_name: &str) -> Self {
        if full_name.is_empty() {
            return Self::default();
        }
        Self { parts: full_name.split('.').map(str::to_string).collect() }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { parts: parts.into_iter().map(Into::into).collect() }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    /// Quote a single name part with backticks unless it is a plain word.
    pub fn quote_part(part: &str) -> String {
        if PLAIN_WORD.is_match(part) {
            part.to_string()
        } else {
            format!("`{}`", part.replace('`', "\\`"))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.parts.iter().map(|part| Identifier::quote_part(part)).collect();
        write!(f, "{}", quoted.join("."))
    }
}

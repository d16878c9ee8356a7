//! Built statements and their parameters

use relq_core::SqlValue;
use serde::Serialize;
use std::fmt;

/// Operands collected while rendering in parameterized mode.
///
/// The index returned by [`push`](Self::push) is the number used in the
/// matching `@<index>` placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterList {
    values: Vec<SqlValue>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its placeholder index
    pub fn push(&mut self, value: SqlValue) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_vec(self) -> Vec<SqlValue> {
        self.values
    }
}

/// A built SQL statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStatement {
    /// Statement text with `@<index>` placeholders (parameterized mode) or
    /// inlined literals
    pub sql: String,
    /// Placeholder values, in index order; empty in inline mode
    pub parameters: Vec<SqlValue>,
}

impl QueryStatement {
    /// Serialize the statement and its parameters as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for QueryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "{}\nParameters: {}", self.sql, parameters.join(", "))
    }
}

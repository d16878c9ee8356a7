//! SQL dialect abstraction
//!
//! A dialect only controls how identifiers and literal values are written;
//! statement structure is the same for every dialect.

use crate::sql_utils::{bracket_ident, quote_literal};
use crate::value::SqlValue;
use chrono::{NaiveDate, NaiveDateTime};

/// Trait for SQL dialect implementations
pub trait Dialect: Send + Sync {
    /// Quote a table or column identifier
    fn escape_identifier(&self, name: &str) -> String;

    /// Render a string literal
    fn format_string_literal(&self, value: &str) -> String;

    /// Render a boolean literal
    fn format_bool_literal(&self, value: bool) -> String {
        value.to_string()
    }

    /// Render a date literal
    fn format_date_literal(&self, value: NaiveDate) -> String;

    /// Render a timestamp literal
    fn format_timestamp_literal(&self, value: NaiveDateTime) -> String;

    /// A complete statement whose scalar result is nonzero iff `table_name` exists
    fn table_exists_probe(&self, table_name: &str) -> String;

    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Render any operand as an inline literal.
    ///
    /// Strings, booleans, dates and timestamps go through the dialect's
    /// formatting; everything else uses its default textual form.
    fn format_literal(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Text(v) => self.format_string_literal(v),
            SqlValue::Bool(v) => self.format_bool_literal(*v),
            SqlValue::Date(v) => self.format_date_literal(*v),
            SqlValue::Timestamp(v) => self.format_timestamp_literal(*v),
            other => other.to_string(),
        }
    }
}

/// SQL Server style dialect: bracketed identifiers, single-quoted literals
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqlServerDialect {
    fn escape_identifier(&self, name: &str) -> String {
        bracket_ident(name)
    }

    fn format_string_literal(&self, value: &str) -> String {
        quote_literal(value)
    }

    // T-SQL has no boolean literals; bit columns compare against 1 / 0
    fn format_bool_literal(&self, value: bool) -> String {
        let bit = if value { "1" } else { "0" };
        bit.to_string()
    }

    fn format_date_literal(&self, value: NaiveDate) -> String {
        quote_literal(&value.format("%Y-%m-%d").to_string())
    }

    fn format_timestamp_literal(&self, value: NaiveDateTime) -> String {
        quote_literal(&value.format("%Y-%m-%d %H:%M:%S").to_string())
    }

    fn table_exists_probe(&self, table_name: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = {}",
            quote_literal(table_name)
        )
    }

    fn name(&self) -> &'static str {
        "sqlserver"
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;

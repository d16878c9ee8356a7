//! SQL quoting helpers shared by dialect implementations

/// Wrap an identifier in square brackets, doubling any embedded `]`.
///
/// # Examples
/// ```
/// use relq_core::sql_utils::bracket_ident;
/// assert_eq!(bracket_ident("Order"), "[Order]");
/// assert_eq!(bracket_ident("odd]name"), "[odd]]name]");
/// ```
pub fn bracket_ident(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use relq_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("Tim"), "'Tim'");
/// assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

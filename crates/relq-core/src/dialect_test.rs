use super::*;

#[test]
fn test_escape_identifier() {
    let dialect = SqlServerDialect::new();
    assert_eq!(dialect.escape_identifier("OrderDate"), "[OrderDate]");
    assert_eq!(dialect.escape_identifier("x]y"), "[x]]y]");
}

#[test]
fn test_string_literal() {
    let dialect = SqlServerDialect::new();
    assert_eq!(dialect.format_string_literal("Tim"), "'Tim'");
    assert_eq!(dialect.format_string_literal("O'Hara"), "'O''Hara'");
}

#[test]
fn test_date_literal() {
    let dialect = SqlServerDialect::new();
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(dialect.format_date_literal(date), "'2024-02-29'");
}

#[test]
fn test_timestamp_literal() {
    let dialect = SqlServerDialect::new();
    let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_opt(13, 5, 0)
        .unwrap();
    assert_eq!(dialect.format_timestamp_literal(ts), "'2024-02-29 13:05:00'");
}

#[test]
fn test_format_literal_dispatch() {
    let dialect = SqlServerDialect::new();
    assert_eq!(dialect.format_literal(&SqlValue::Int(5)), "5");
    assert_eq!(dialect.format_literal(&SqlValue::Float(1.25)), "1.25");
    assert_eq!(dialect.format_literal(&SqlValue::Bool(true)), "1");
    assert_eq!(dialect.format_literal(&SqlValue::Bool(false)), "0");
    assert_eq!(dialect.format_literal(&SqlValue::Null), "NULL");
    assert_eq!(
        dialect.format_literal(&SqlValue::Text("Julia".into())),
        "'Julia'"
    );
    let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    assert_eq!(dialect.format_literal(&SqlValue::Date(date)), "'2023-12-01'");
}

#[test]
fn test_table_exists_probe() {
    let dialect = SqlServerDialect::new();
    assert_eq!(
        dialect.table_exists_probe("Customer"),
        "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = 'Customer'"
    );
    assert!(dialect
        .table_exists_probe("it's")
        .ends_with("TABLE_NAME = 'it''s'"));
}

#[test]
fn test_dialect_name() {
    assert_eq!(SqlServerDialect::new().name(), "sqlserver");
}

/// Dialect relying on the provided literal defaults
struct PlainDialect;

impl Dialect for PlainDialect {
    fn escape_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name)
    }

    fn format_string_literal(&self, value: &str) -> String {
        format!("'{}'", value)
    }

    fn format_date_literal(&self, value: NaiveDate) -> String {
        format!("DATE '{}'", value)
    }

    fn format_timestamp_literal(&self, value: chrono::NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", value)
    }

    fn table_exists_probe(&self, table_name: &str) -> String {
        format!("SELECT 1 FROM {}", table_name)
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

#[test]
fn test_default_bool_literal() {
    assert_eq!(PlainDialect.format_literal(&SqlValue::Bool(true)), "true");
    assert_eq!(PlainDialect.format_literal(&SqlValue::Bool(false)), "false");
}

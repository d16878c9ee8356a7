//! Operand values and declared column types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared value type of a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Text,
    Date,
    Timestamp,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Text => "text",
            ValueType::Date => "date",
            ValueType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Rust types that can back a mapped column.
///
/// `Option<T>` maps to the same value type as `T` and marks the column
/// nullable.
pub trait SqlType: Into<SqlValue> {
    /// Value type recorded in the column metadata
    const VALUE_TYPE: ValueType;

    /// Whether the column accepts NULL
    const NULLABLE: bool = false;
}

/// An operand bound to a comparison.
///
/// Serializes untagged so parameter dumps read as plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// True for `SqlValue::Null`
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// The value type this operand carries, `None` for NULL
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            SqlValue::Null => None,
            SqlValue::Bool(_) => Some(ValueType::Bool),
            SqlValue::Int(_) => Some(ValueType::Int),
            SqlValue::Float(_) => Some(ValueType::Float),
            SqlValue::Text(_) => Some(ValueType::Text),
            SqlValue::Date(_) => Some(ValueType::Date),
            SqlValue::Timestamp(_) => Some(ValueType::Timestamp),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            SqlValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::Int(i64::from(v))
                }
            }

            impl SqlType for $ty {
                const VALUE_TYPE: ValueType = ValueType::Int;
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl SqlType for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;
}

impl SqlType for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;
}

impl SqlType for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;
}

impl SqlType for String {
    const VALUE_TYPE: ValueType = ValueType::Text;
}

impl SqlType for NaiveDate {
    const VALUE_TYPE: ValueType = ValueType::Date;
}

impl SqlType for NaiveDateTime {
    const VALUE_TYPE: ValueType = ValueType::Timestamp;
}

impl<T: SqlType> SqlType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;
    const NULLABLE: bool = true;
}

/// Key types that can be equated in a join condition.
///
/// A key joins to a key of the same type, and a nullable key joins to the
/// non-null form of its type, so `Option<i32>` foreign keys join `i32`
/// primary keys in either direction.
pub trait JoinKey<Other> {}

macro_rules! impl_join_key {
    ($($ty:ty),*) => {
        $(
            impl JoinKey<$ty> for $ty {}
            impl JoinKey<Option<$ty>> for $ty {}
            impl JoinKey<$ty> for Option<$ty> {}
            impl JoinKey<Option<$ty>> for Option<$ty> {}
        )*
    };
}

impl_join_key!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    String,
    NaiveDate,
    NaiveDateTime
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversions_widen_to_i64() {
        assert_eq!(SqlValue::from(5_i32), SqlValue::Int(5));
        assert_eq!(SqlValue::from(7_u16), SqlValue::Int(7));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(None::<i32>), SqlValue::Null);
        assert_eq!(
            SqlValue::from(Some("Tim")),
            SqlValue::Text("Tim".to_string())
        );
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(SqlValue::Date(date).to_string(), "2024-03-09");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Float(2.5).to_string(), "2.5");
        assert_eq!(SqlValue::Text("Julia".into()).to_string(), "Julia");
    }

    #[test]
    fn test_value_type_of_option_is_nullable() {
        assert_eq!(<Option<String> as SqlType>::VALUE_TYPE, ValueType::Text);
        assert!(<Option<String> as SqlType>::NULLABLE);
        assert!(!<String as SqlType>::NULLABLE);
    }

    fn joins<L: JoinKey<R>, R>() {}

    #[test]
    fn test_join_key_accepts_nullable_forms() {
        joins::<i32, i32>();
        joins::<Option<i32>, i32>();
        joins::<i32, Option<i32>>();
        joins::<Option<String>, Option<String>>();
        joins::<NaiveDate, Option<NaiveDate>>();
    }

    #[test]
    fn test_serialize_untagged() {
        let values = vec![
            SqlValue::Int(5),
            SqlValue::Text("Tim".into()),
            SqlValue::Null,
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[5,"Tim",null,"2024-01-31"]"#);
    }
}

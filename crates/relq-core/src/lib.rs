//! relq-core - Core library for relq
//!
//! This crate provides the shared building blocks of the query builder:
//! entity declarations and typed field keys, the table metadata cache,
//! operand values, the SQL dialect contract, and configuration.

pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod metadata;
mod newtype_string;
pub mod sql_utils;
pub mod value;

pub use config::{Layout, QueryConfig, RenderMode};
pub use dialect::{Dialect, SqlServerDialect};
pub use entity::{Entity, Field, MemberPath};
pub use error::{CoreError, CoreResult, MappingError, MappingResult};
pub use metadata::{
    ColumnDescriptor, ColumnMetadata, ColumnName, MetadataCache, TableDescriptor, TableKey,
    TableMetadata, TableMetadataProvider, TableName,
};
pub use value::{JoinKey, SqlType, SqlValue, ValueType};

//! Error types for relq-core

use thiserror::Error;

/// Errors raised while turning an entity description into table metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// M001: Entity declares no table name
    #[error("[M001] Entity '{type_name}' does not declare a table name")]
    MissingTableName { type_name: String },

    /// M002: Entity declares no columns
    #[error("[M002] Entity '{type_name}' (table '{table}') declares no columns")]
    NoColumns { type_name: String, table: String },

    /// M003: Primary key path does not name a column
    #[error("[M003] Primary key '{path}' of table '{table}' is not a mapped column")]
    UnknownPrimaryKey { table: String, path: String },

    /// M004: Two properties share the same path
    #[error("[M004] Duplicate property path '{path}' on table '{table}'")]
    DuplicatePath { table: String, path: String },

    /// M005: Two properties map to the same column
    #[error("[M005] Duplicate column '{column}' on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// M006: Property has neither a path nor a column name
    #[error("[M006] Table '{table}' maps a property with no path or column name")]
    UnnamedColumn { table: String },
}

/// Result type alias for MappingError
pub type MappingResult<T> = Result<T, MappingError>;

/// Core error type for relq configuration handling
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: IO error with file path context
    #[error("[C004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

//! Error types for relq-query

use relq_core::MappingError;
use thiserror::Error;

/// Query declaration errors, reported when a statement is built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Table referenced but never introduced by FROM or a JOIN (Q001)
    #[error("[Q001] Table '{table}' has not been added to the FROM clause")]
    UnresolvedTable { table: String },

    /// Table referenced before its join is processed (Q002)
    #[error("[Q002] Incorrect join order: '{table}' is used before it has been joined")]
    JoinOrder { table: String },

    /// Property path names no column of the table (Q003)
    #[error("[Q003] Table '{table}' has no column mapped to property '{path}'")]
    UnknownColumn { table: String, path: String },

    /// `end_group` called with no open group (Q004)
    #[error("[Q004] Filter group closed without a matching begin_group")]
    UnbalancedGroup,

    /// Connective with no predicate on one side (Q006)
    #[error("[Q006] Dangling '{connective}' in filter: it must sit between two predicates or groups")]
    DanglingConnective { connective: String },

    /// Two predicates or groups with no AND / OR between them (Q007)
    #[error("[Q007] Missing AND / OR between two filter predicates")]
    MissingConnective,

    /// Entity type could not be mapped to a table (Q005)
    #[error("[Q005] {0}")]
    Mapping(#[from] MappingError),
}

/// Result type alias for QueryError
pub type QueryResult<T> = Result<T, QueryError>;

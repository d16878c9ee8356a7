//! relq-query - Statement assembly for relq
//!
//! This crate turns a fluent sequence of join, filter, ordering and
//! projection declarations over [`relq_core::Entity`] types into one SQL
//! statement plus its positional parameters.

pub mod assembler;
pub mod column;
pub mod error;
pub mod filter;
pub mod join;
pub mod order;
pub mod probe;
pub mod projection;
pub mod query;
pub mod statement;

pub use error::{QueryError, QueryResult};
pub use filter::{ComparisonOp, Connective, FilterTree, GroupHandle};
pub use join::{AliasMap, JoinType};
pub use order::SortDirection;
pub use probe::table_exists_statement;
pub use query::Query;
pub use statement::{ParameterList, QueryStatement};

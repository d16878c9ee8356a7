//! Fluent query builder
//!
//! A [`Query`] accumulates declarations against a root entity `T` and builds
//! them into a [`QueryStatement`] on demand. Declarations never fail; every
//! misuse (unknown column, table used before it is joined, ...) is reported
//! by [`Query::build`].

use crate::assembler::Assembler;
use crate::column::ColumnRef;
use crate::error::QueryResult;
use crate::filter::{Comparison, ComparisonOp, Connective, FilterTree, GroupHandle};
use crate::join::{JoinGraph, JoinType};
use crate::order::{OrderingList, SortDirection};
use crate::projection::ProjectionList;
use crate::statement::QueryStatement;
use relq_core::{
    Dialect, Entity, Field, JoinKey, QueryConfig, RenderMode, SqlServerDialect, SqlValue, TableKey,
    TableMetadataProvider,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A SELECT over the root entity `T` and any joined entities.
///
/// ```
/// use relq_core::{entity, MetadataCache};
/// use relq_query::Query;
///
/// entity! {
///     pub struct Order in "Order" key id {
///         pub id: i32 => "ID",
///         pub customer_id: i32 => "CustomerID",
///     }
/// }
///
/// entity! {
///     pub struct Customer in "Customer" key id {
///         pub id: i32 => "ID",
///         pub name: String => "Name",
///     }
/// }
///
/// let cache = MetadataCache::new();
/// let mut query = Query::<Order>::new(&cache);
/// query
///     .inner_join(Order::customer_id, Customer::id)
///     .equal(Customer::name, "Tim")
///     .ascending(Order::id);
///
/// let statement = query.build().unwrap();
/// assert!(statement.sql.contains("INNER JOIN [Customer] AS b ON a.[CustomerID] = b.[ID]"));
/// assert!(statement.sql.ends_with("WHERE b.[Name] = @0 ORDER BY a.[ID]"));
/// assert_eq!(statement.parameters.len(), 1);
/// ```
pub struct Query<'a, T: Entity> {
    provider: &'a dyn TableMetadataProvider,
    dialect: Arc<dyn Dialect>,
    config: QueryConfig,
    joins: JoinGraph,
    filter: FilterTree,
    ordering: OrderingList,
    projection: ProjectionList,
    _root: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> Query<'a, T> {
    /// Start a query rooted at `T`, using the SQL Server dialect and default config
    pub fn new(provider: &'a dyn TableMetadataProvider) -> Self {
        Self {
            provider,
            dialect: Arc::new(SqlServerDialect),
            config: QueryConfig::default(),
            joins: JoinGraph::new(),
            filter: FilterTree::new(),
            ordering: OrderingList::new(),
            projection: ProjectionList::new(),
            _root: PhantomData,
        }
    }

    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    // Joins

    /// `INNER JOIN R ON left = right`, with `R`'s columns displayed
    pub fn inner_join<L: Entity, R: Entity, LK: JoinKey<RK>, RK>(
        &mut self,
        left: Field<L, LK>,
        right: Field<R, RK>,
    ) -> &mut Self {
        self.join(JoinType::Inner, left, right, true)
    }

    /// `LEFT OUTER JOIN R ON left = right`, with `R`'s columns displayed
    pub fn left_outer_join<L: Entity, R: Entity, LK: JoinKey<RK>, RK>(
        &mut self,
        left: Field<L, LK>,
        right: Field<R, RK>,
    ) -> &mut Self {
        self.join(JoinType::LeftOuter, left, right, true)
    }

    /// `RIGHT OUTER JOIN R ON left = right`, with `R`'s columns displayed
    pub fn right_outer_join<L: Entity, R: Entity, LK: JoinKey<RK>, RK>(
        &mut self,
        left: Field<L, LK>,
        right: Field<R, RK>,
    ) -> &mut Self {
        self.join(JoinType::RightOuter, left, right, true)
    }

    /// Join `R` on `left = right`.
    ///
    /// `left` must belong to the root or to a table joined earlier. With
    /// `display` false the join only links tables and contributes no columns
    /// to the automatic projection. The keys must share a value type, up to
    /// nullability (see [`JoinKey`]).
    pub fn join<L: Entity, R: Entity, LK: JoinKey<RK>, RK>(
        &mut self,
        kind: JoinType,
        left: Field<L, LK>,
        right: Field<R, RK>,
        display: bool,
    ) -> &mut Self {
        self.joins
            .add_join(kind, ColumnRef::of(&left), ColumnRef::of(&right), display);
        self
    }

    /// `CROSS JOIN R`, with `R`'s columns displayed
    pub fn cross_join<R: Entity>(&mut self) -> &mut Self {
        self.joins.add_cross_join(TableKey::of::<R>(), true);
        self
    }

    // Filters

    fn push_comparison<E: Entity, V>(
        &mut self,
        field: Field<E, V>,
        op: ComparisonOp,
        value: SqlValue,
    ) -> &mut Self {
        self.filter.push_comparison(Comparison {
            column: ColumnRef::of(&field),
            op,
            value,
        });
        self
    }

    fn compare<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        op: ComparisonOp,
        value: V,
    ) -> &mut Self {
        self.push_comparison(field, op, value.into())
    }

    pub fn equal<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::Equal, value.into())
    }

    pub fn not_equal<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::NotEqual, value.into())
    }

    pub fn less_than<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::LessThan, value.into())
    }

    pub fn less_than_or_equal<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::LessThanOrEqual, value.into())
    }

    pub fn greater_than<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::GreaterThan, value.into())
    }

    pub fn greater_than_or_equal<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::GreaterThanOrEqual, value.into())
    }

    /// `LIKE` with a caller-supplied pattern (wildcards are not added)
    pub fn like<E: Entity, V: Into<SqlValue>>(
        &mut self,
        field: Field<E, V>,
        pattern: impl Into<V>,
    ) -> &mut Self {
        self.compare(field, ComparisonOp::Like, pattern.into())
    }

    pub fn is_null<E: Entity, V>(&mut self, field: Field<E, V>) -> &mut Self {
        self.push_comparison(field, ComparisonOp::IsNull, SqlValue::Null)
    }

    pub fn is_not_null<E: Entity, V>(&mut self, field: Field<E, V>) -> &mut Self {
        self.push_comparison(field, ComparisonOp::IsNotNull, SqlValue::Null)
    }

    pub fn and(&mut self) -> &mut Self {
        self.filter.push_connective(Connective::And);
        self
    }

    pub fn or(&mut self) -> &mut Self {
        self.filter.push_connective(Connective::Or);
        self
    }

    /// Open a parenthesized group; close it with [`end_group`](Self::end_group)
    pub fn begin_group(&mut self) -> GroupHandle {
        self.filter.begin_group()
    }

    /// Close the innermost open group
    pub fn end_group(&mut self) -> &mut Self {
        self.filter.end_group();
        self
    }

    /// Declare a parenthesized group inside `f`
    pub fn group(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.begin_group();
        f(self);
        self.end_group()
    }

    // Ordering and projection

    pub fn ascending<E: Entity, V>(&mut self, field: Field<E, V>) -> &mut Self {
        self.ordering
            .push(ColumnRef::of(&field), SortDirection::Ascending);
        self
    }

    pub fn descending<E: Entity, V>(&mut self, field: Field<E, V>) -> &mut Self {
        self.ordering
            .push(ColumnRef::of(&field), SortDirection::Descending);
        self
    }

    /// Add a column to the SELECT list; without any, all displayed columns are selected
    pub fn select<E: Entity, V>(&mut self, field: Field<E, V>) -> &mut Self {
        self.projection.push(ColumnRef::of(&field));
        self
    }

    // Building

    /// Build in the configured render mode (parameterized unless configured otherwise)
    pub fn build(&self) -> QueryResult<QueryStatement> {
        self.build_with(self.config.mode)
    }

    /// Build with operands inlined as literals
    pub fn build_inline(&self) -> QueryResult<QueryStatement> {
        self.build_with(RenderMode::Inline)
    }

    pub fn build_with(&self, mode: RenderMode) -> QueryResult<QueryStatement> {
        self.assembler().assemble(mode)
    }

    /// Parameterized statement followed by its parameter values, for display
    pub fn preview(&self) -> QueryResult<String> {
        Ok(self.build_with(RenderMode::Parameterized)?.to_string())
    }

    fn assembler(&self) -> Assembler<'_> {
        Assembler {
            provider: self.provider,
            dialect: self.dialect.as_ref(),
            config: &self.config,
            root: TableKey::of::<T>(),
            joins: &self.joins,
            filter: &self.filter,
            ordering: &self.ordering,
            projection: &self.projection,
        }
    }

    pub fn joins(&self) -> &JoinGraph {
        &self.joins
    }

    pub fn filter(&self) -> &FilterTree {
        &self.filter
    }

    pub fn ordering(&self) -> &OrderingList {
        &self.ordering
    }

    pub fn projection(&self) -> &ProjectionList {
        &self.projection
    }
}

impl<T: Entity> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("root", &std::any::type_name::<T>())
            .field("dialect", &self.dialect.name())
            .field("config", &self.config)
            .field("joins", &self.joins)
            .field("filter", &self.filter)
            .field("ordering", &self.ordering)
            .field("projection", &self.projection)
            .finish()
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

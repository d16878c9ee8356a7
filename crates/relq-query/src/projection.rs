//! SELECT list
//!
//! An explicit list of columns, or, when nothing was selected, the automatic
//! projection: root columns, then the columns of every displayed join.

use crate::column::{ColumnRef, Scope};
use crate::error::QueryResult;
use crate::join::AliasedGraph;
use relq_core::TableMetadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionEntry {
    pub column: ColumnRef,
}

/// Explicitly selected columns, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionList {
    entries: Vec<ProjectionEntry>,
}

impl ProjectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: ColumnRef) {
        self.entries.push(ProjectionEntry { column });
    }

    pub fn entries(&self) -> &[ProjectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Qualified column expressions for the SELECT list
    pub fn render(
        &self,
        scope: &Scope<'_>,
        root: &TableMetadata,
        graph: &AliasedGraph,
    ) -> QueryResult<Vec<String>> {
        if self.entries.is_empty() {
            return Ok(automatic_projection(scope, root, graph));
        }

        self.entries
            .iter()
            .map(|entry| scope.qualify(&entry.column))
            .collect()
    }
}

/// Root primary key and remaining columns, then the same for each displayed
/// join in declaration order. Hidden joins contribute nothing.
fn automatic_projection(
    scope: &Scope<'_>,
    root: &TableMetadata,
    graph: &AliasedGraph,
) -> Vec<String> {
    let mut columns: Vec<String> = root
        .key_first_columns()
        .map(|column| scope.qualify_name(&graph.root_alias, column))
        .collect();

    for join in graph.joins.iter().filter(|join| join.display) {
        columns.extend(
            join.table
                .key_first_columns()
                .map(|column| scope.qualify_name(&join.alias, column)),
        );
    }
    columns
}

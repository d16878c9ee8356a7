//! Statement assembly
//!
//! Reads the declared joins, filters, ordering and projection and renders
//! them into one statement: FROM (which runs the alias pass), SELECT, WHERE,
//! ORDER BY, concatenated in SELECT / FROM / WHERE / ORDER BY order.

use crate::column::Scope;
use crate::error::{QueryError, QueryResult};
use crate::filter::FilterTree;
use crate::join::{AliasedJoin, JoinGraph, JoinType};
use crate::order::OrderingList;
use crate::projection::ProjectionList;
use crate::statement::{ParameterList, QueryStatement};
use relq_core::{Dialect, Layout, QueryConfig, RenderMode, TableKey, TableMetadataProvider};

/// Read-only view over a query's declarations
pub struct Assembler<'a> {
    pub provider: &'a dyn TableMetadataProvider,
    pub dialect: &'a dyn Dialect,
    pub config: &'a QueryConfig,
    pub root: TableKey,
    pub joins: &'a JoinGraph,
    pub filter: &'a FilterTree,
    pub ordering: &'a OrderingList,
    pub projection: &'a ProjectionList,
}

/// Rendered clause bodies, before layout
struct Clauses {
    select: Vec<String>,
    from: String,
    joins: Vec<String>,
    predicate: String,
    order_by: Option<String>,
}

impl Assembler<'_> {
    /// Build the statement in the given mode
    pub fn assemble(&self, mode: RenderMode) -> QueryResult<QueryStatement> {
        let root = self.provider.table_metadata(&self.root)?;
        let graph = self.joins.alias_pass(&root, self.provider)?;
        let scope = Scope {
            provider: self.provider,
            dialect: self.dialect,
            aliases: &graph.aliases,
        };

        let from = format!(
            "FROM {} AS {}",
            self.dialect.escape_identifier(root.name()),
            graph.root_alias
        );
        let joins: Vec<String> = graph
            .joins
            .iter()
            .map(|join| self.render_join(&scope, join))
            .collect();

        let select = self.projection.render(&scope, &root, &graph)?;

        let mut params = ParameterList::new();
        let predicate = self.render_predicate(&scope, mode, &mut params)?;
        let order_by = self.ordering.render(&scope)?;

        let sql = self.layout(Clauses {
            select,
            from,
            joins,
            predicate,
            order_by,
        });
        log::debug!(
            "Built {} statement for '{}': {} joins, {} parameters",
            mode,
            root.name(),
            graph.joins.len(),
            params.len()
        );

        Ok(QueryStatement {
            sql,
            parameters: params.into_vec(),
        })
    }

    fn render_join(&self, scope: &Scope<'_>, join: &AliasedJoin) -> String {
        let mut clause = format!(
            "{} {} AS {}",
            join.kind.keyword(),
            self.dialect.escape_identifier(join.table.name()),
            join.alias
        );
        if join.kind == JoinType::Cross {
            return clause;
        }
        if let Some(condition) = &join.condition {
            clause.push_str(&format!(
                " ON {} = {}",
                scope.qualify_name(&condition.left_alias, &condition.left_key),
                scope.qualify_name(&join.alias, &condition.right_key)
            ));
        }
        clause
    }

    fn render_predicate(
        &self,
        scope: &Scope<'_>,
        mode: RenderMode,
        params: &mut ParameterList,
    ) -> QueryResult<String> {
        if self.filter.is_unbalanced() {
            return Err(QueryError::UnbalancedGroup);
        }
        if self.filter.open_depth() > 0 {
            log::warn!(
                "Closing {} filter group(s) left open at build time",
                self.filter.open_depth()
            );
        }

        let sink = match mode {
            RenderMode::Parameterized => Some(params),
            RenderMode::Inline => None,
        };
        self.filter.closed().render(scope, sink)
    }

    fn layout(&self, clauses: Clauses) -> String {
        let mut parts = Vec::with_capacity(4);
        match self.config.layout {
            Layout::Compact => {
                parts.push(format!("SELECT {}", clauses.select.join(", ")));
                let mut from = clauses.from;
                for join in &clauses.joins {
                    from.push(' ');
                    from.push_str(join);
                }
                parts.push(from);
            }
            Layout::Multiline => {
                let indent = &self.config.indent;
                let columns: Vec<String> = clauses
                    .select
                    .iter()
                    .map(|column| format!("{}{}", indent, column))
                    .collect();
                parts.push(format!("SELECT\n{}", columns.join(",\n")));
                let mut from = clauses.from;
                for join in &clauses.joins {
                    from.push('\n');
                    from.push_str(indent);
                    from.push_str(join);
                }
                parts.push(from);
            }
        }

        if !clauses.predicate.is_empty() {
            parts.push(format!("WHERE {}", clauses.predicate));
        }
        if let Some(order_by) = clauses.order_by {
            parts.push(format!("ORDER BY {}", order_by));
        }

        let separator = match self.config.layout {
            Layout::Compact => " ",
            Layout::Multiline => "\n",
        };
        parts.join(separator)
    }
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod tests;

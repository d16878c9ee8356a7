//! Join graph and alias assignment
//!
//! Joins are kept in declaration order. Aliases are not stored on the
//! declarations: every build runs [`JoinGraph::alias_pass`], which walks the
//! joins in order and produces an [`AliasMap`] for that build only.

use crate::column::ColumnRef;
use crate::error::{QueryError, QueryResult};
use relq_core::{ColumnName, TableKey, TableMetadata, TableMetadataProvider, TableName};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Join flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    Cross,
}

impl JoinType {
    /// SQL keyword introducing the join
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Key columns a join matches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOn {
    /// Key on an already introduced table
    pub left: ColumnRef,
    /// Key on the joined table
    pub right: ColumnRef,
}

/// One declared join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDeclaration {
    pub kind: JoinType,
    /// The table being joined
    pub right: TableKey,
    /// Match condition, absent for keyless cross joins
    pub on: Option<JoinOn>,
    /// Whether the joined columns appear in the automatic projection
    pub display: bool,
}

/// Ordered sequence of join declarations
#[derive(Debug, Clone, Default)]
pub struct JoinGraph {
    joins: Vec<JoinDeclaration>,
}

impl JoinGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a join on `left = right`; the joined table is `right`'s entity.
    pub fn add_join(&mut self, kind: JoinType, left: ColumnRef, right: ColumnRef, display: bool) {
        self.joins.push(JoinDeclaration {
            kind,
            right: *right.table(),
            on: Some(JoinOn { left, right }),
            display,
        });
    }

    /// Append a cross join with no match condition
    pub fn add_cross_join(&mut self, right: TableKey, display: bool) {
        self.joins.push(JoinDeclaration {
            kind: JoinType::Cross,
            right,
            on: None,
            display,
        });
    }

    pub fn joins(&self) -> &[JoinDeclaration] {
        &self.joins
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Assign aliases in declaration order.
    ///
    /// The root gets `a`; each join takes the next alias. A join's left key
    /// may only name the root or a table joined earlier in the sequence.
    pub fn alias_pass(
        &self,
        root: &TableMetadata,
        provider: &dyn TableMetadataProvider,
    ) -> QueryResult<AliasedGraph> {
        let tables = self
            .joins
            .iter()
            .map(|join| provider.table_metadata(&join.right))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sequence = AliasSequence::default();
        let mut aliases = AliasMap::new(tables.iter().map(|t| t.name().clone()));
        let root_alias = sequence.advance();
        aliases.assign(root.name(), root_alias.clone());

        let mut joins = Vec::with_capacity(self.joins.len());
        for (join, table) in self.joins.iter().zip(tables) {
            let condition = match &join.on {
                Some(on) => {
                    let left_table = on.left.resolve_table(provider)?;
                    let left_alias = aliases.resolve(left_table.name())?.to_string();
                    Some(JoinCondition {
                        left_alias,
                        left_key: on.left.column_in(&left_table)?.name.clone(),
                        right_key: on.right.column_in(&table)?.name.clone(),
                    })
                }
                None => None,
            };

            let alias = sequence.advance();
            log::trace!("Assigned alias '{}' to joined table '{}'", alias, table.name());
            aliases.assign(table.name(), alias.clone());
            joins.push(AliasedJoin {
                kind: join.kind,
                table,
                alias,
                condition,
                display: join.display,
            });
        }

        Ok(AliasedGraph {
            root_alias,
            aliases,
            joins,
        })
    }
}

/// Resolved ON condition of an aliased join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left_alias: String,
    pub left_key: ColumnName,
    pub right_key: ColumnName,
}

/// A join after the alias pass
#[derive(Debug, Clone)]
pub struct AliasedJoin {
    pub kind: JoinType,
    pub table: Arc<TableMetadata>,
    pub alias: String,
    pub condition: Option<JoinCondition>,
    pub display: bool,
}

/// Output of the alias pass
#[derive(Debug, Clone)]
pub struct AliasedGraph {
    pub root_alias: String,
    pub aliases: AliasMap,
    pub joins: Vec<AliasedJoin>,
}

/// Table name to alias mapping for one build.
///
/// The first introduction of a table wins: when a table is joined more than
/// once (or joined back to the root), lookups return its earliest alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    assigned: HashMap<TableName, String>,
    /// Every joined table, aliased yet or not
    joined: HashSet<TableName>,
}

impl AliasMap {
    /// Create an empty map that knows which tables will be joined
    pub fn new(joined: impl IntoIterator<Item = TableName>) -> Self {
        Self {
            assigned: HashMap::new(),
            joined: joined.into_iter().collect(),
        }
    }

    /// Record `alias` for `table` unless the table already has one
    pub fn assign(&mut self, table: &TableName, alias: String) {
        self.assigned.entry(table.clone()).or_insert(alias);
    }

    /// Alias of an introduced table.
    ///
    /// Fails with [`QueryError::JoinOrder`] when the table is joined later
    /// than this lookup, and [`QueryError::UnresolvedTable`] when it is not
    /// joined at all.
    pub fn resolve(&self, table: &TableName) -> QueryResult<&str> {
        if let Some(alias) = self.assigned.get(table) {
            return Ok(alias.as_str());
        }
        if self.joined.contains(table) {
            Err(QueryError::JoinOrder {
                table: table.to_string(),
            })
        } else {
            Err(QueryError::UnresolvedTable {
                table: table.to_string(),
            })
        }
    }

    /// Number of tables with an alias
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Words the alias sequence never hands out, since they would parse as
/// keywords after `AS`.
const RESERVED_ALIASES: &[&str] = &[
    "as", "at", "by", "go", "if", "in", "is", "of", "on", "or", "to", "add", "all", "and", "any",
    "asc", "end", "for", "key", "not", "set", "top", "use",
];

/// Deterministic alias generator: `a`..`z`, then `aa`, `ab`, ... skipping
/// reserved words.
#[derive(Debug, Default)]
pub(crate) struct AliasSequence {
    next: usize,
}

impl AliasSequence {
    pub(crate) fn advance(&mut self) -> String {
        loop {
            let alias = alias_for_index(self.next);
            self.next += 1;
            if !RESERVED_ALIASES.contains(&alias.as_str()) {
                return alias;
            }
        }
    }
}

/// Bijective base-26 spelling of `index`: 0 is `a`, 25 is `z`, 26 is `aa`.
pub(crate) fn alias_for_index(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
#[path = "join_test.rs"]
mod tests;

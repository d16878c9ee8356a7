//! ORDER BY entries

use crate::column::{ColumnRef, Scope};
use crate::error::QueryResult;

/// Sort direction of an ORDER BY entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

/// Ordered list of sort keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingList {
    entries: Vec<OrderEntry>,
}

impl OrderingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: ColumnRef, direction: SortDirection) {
        self.entries.push(OrderEntry { column, direction });
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the comma-separated sort keys, without the `ORDER BY` keyword.
    /// Returns `None` when there is nothing to sort by.
    pub fn render(&self, scope: &Scope<'_>) -> QueryResult<Option<String>> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let keys = self
            .entries
            .iter()
            .map(|entry| {
                let column = scope.qualify(&entry.column)?;
                Ok(match entry.direction {
                    SortDirection::Ascending => column,
                    SortDirection::Descending => format!("{} DESC", column),
                })
            })
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Some(keys.join(", ")))
    }
}

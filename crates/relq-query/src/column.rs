//! Unresolved column references

use crate::error::{QueryError, QueryResult};
use crate::join::AliasMap;
use relq_core::{
    ColumnMetadata, ColumnName, Dialect, MemberPath, TableKey, TableMetadata,
    TableMetadataProvider,
};
use std::sync::Arc;

/// A property of an entity, recorded at declaration time and resolved
/// against table metadata when the statement is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    table: TableKey,
    path: String,
}

impl ColumnRef {
    /// Reference the property behind a typed field key
    pub fn of<F: MemberPath>(field: &F) -> Self {
        Self {
            table: TableKey::of::<F::Entity>(),
            path: field.member_path().to_string(),
        }
    }

    /// The entity the property belongs to
    pub fn table(&self) -> &TableKey {
        &self.table
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve the owning table's metadata
    pub fn resolve_table(
        &self,
        provider: &dyn TableMetadataProvider,
    ) -> QueryResult<Arc<TableMetadata>> {
        Ok(provider.table_metadata(&self.table)?)
    }

    /// Find this property's column on an already resolved table
    pub fn column_in<'t>(&self, table: &'t TableMetadata) -> QueryResult<&'t ColumnMetadata> {
        table
            .column_for_path(&self.path)
            .ok_or_else(|| QueryError::UnknownColumn {
                table: table.name().to_string(),
                path: self.path.clone(),
            })
    }
}

/// Everything needed to turn a column reference into `<alias>.<column>`
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub provider: &'a dyn TableMetadataProvider,
    pub dialect: &'a dyn Dialect,
    pub aliases: &'a AliasMap,
}

impl Scope<'_> {
    /// Render `<alias>.<escaped column>` for a declared column
    pub fn qualify(&self, column: &ColumnRef) -> QueryResult<String> {
        let table = column.resolve_table(self.provider)?;
        let alias = self.aliases.resolve(table.name())?;
        let metadata = column.column_in(&table)?;
        Ok(self.qualify_name(alias, &metadata.name))
    }

    /// Render `<alias>.<escaped column>` for a known column name
    pub fn qualify_name(&self, alias: &str, column: &ColumnName) -> String {
        format!("{}.{}", alias, self.dialect.escape_identifier(column))
    }
}

//! Table metadata and the per-type metadata cache
//!
//! Entities describe themselves with a [`TableDescriptor`]. The
//! [`MetadataCache`] validates each description once, turns it into an
//! immutable [`TableMetadata`], and hands out shared references to it.

use crate::entity::Entity;
use crate::error::{MappingError, MappingResult};
use crate::newtype_string::define_identifier;
use crate::value::{SqlType, ValueType};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

define_identifier! {
    /// Name of a mapped table
    pub struct TableName;
}

define_identifier! {
    /// Name of a mapped column
    pub struct ColumnName;
}

/// Unvalidated description of one mapped property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Dotted property path on the record type
    pub path: String,

    /// Column the property is stored in
    pub column: String,

    /// Declared value type
    pub value_type: ValueType,

    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Describe a property with an explicit value type.
    pub fn new(path: impl Into<String>, column: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
            value_type,
            nullable: false,
        }
    }

    /// Describe a property whose value type is taken from the Rust type `V`.
    pub fn of<V: SqlType>(path: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            nullable: V::NULLABLE,
            ..Self::new(path, column, V::VALUE_TYPE)
        }
    }
}

/// Unvalidated description of a mapped table, as returned by [`Entity::describe`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub table: String,

    /// Property path of the primary key
    pub primary_key: String,

    /// Mapped properties in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Start a description of `table` keyed by the property at `primary_key`.
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            columns: Vec::new(),
        }
    }

    /// Append a mapped property.
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }
}

/// Resolved metadata of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadata {
    pub path: String,
    pub name: ColumnName,
    pub value_type: ValueType,
    pub nullable: bool,
}

/// Validated, immutable metadata of a mapped table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMetadata {
    type_name: String,
    name: TableName,
    primary_key: ColumnName,
    /// Column names in declaration order
    columns: Vec<ColumnName>,
    by_path: HashMap<String, ColumnMetadata>,
}

impl TableMetadata {
    /// Validate `descriptor` for the type called `type_name`.
    pub fn from_descriptor(type_name: &str, descriptor: TableDescriptor) -> MappingResult<Self> {
        let name =
            TableName::try_new(descriptor.table).ok_or_else(|| MappingError::MissingTableName {
                type_name: type_name.to_string(),
            })?;

        if descriptor.columns.is_empty() {
            return Err(MappingError::NoColumns {
                type_name: type_name.to_string(),
                table: name.to_string(),
            });
        }

        let mut columns = Vec::with_capacity(descriptor.columns.len());
        let mut by_path = HashMap::with_capacity(descriptor.columns.len());
        let mut seen_columns = HashSet::new();

        for column in descriptor.columns {
            let column_name = ColumnName::try_new(column.column.as_str())
                .or_else(|| ColumnName::try_new(column.path.as_str()))
                .ok_or_else(|| MappingError::UnnamedColumn {
                    table: name.to_string(),
                })?;
            if !seen_columns.insert(column_name.clone()) {
                return Err(MappingError::DuplicateColumn {
                    table: name.to_string(),
                    column: column_name.to_string(),
                });
            }
            if by_path.contains_key(&column.path) {
                return Err(MappingError::DuplicatePath {
                    table: name.to_string(),
                    path: column.path,
                });
            }
            columns.push(column_name.clone());
            by_path.insert(
                column.path.clone(),
                ColumnMetadata {
                    path: column.path,
                    name: column_name,
                    value_type: column.value_type,
                    nullable: column.nullable,
                },
            );
        }

        let primary_key = by_path
            .get(&descriptor.primary_key)
            .map(|c| c.name.clone())
            .ok_or_else(|| MappingError::UnknownPrimaryKey {
                table: name.to_string(),
                path: descriptor.primary_key.clone(),
            })?;

        Ok(Self {
            type_name: type_name.to_string(),
            name,
            primary_key,
            columns,
            by_path,
        })
    }

    /// Name of the Rust type this table was resolved from
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    pub fn primary_key(&self) -> &ColumnName {
        &self.primary_key
    }

    /// All column names in declaration order
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Primary key first, then the remaining columns in declaration order
    pub fn key_first_columns(&self) -> impl Iterator<Item = &ColumnName> {
        std::iter::once(&self.primary_key)
            .chain(self.columns.iter().filter(move |c| **c != self.primary_key))
    }

    /// Look up the column mapped to a property path
    pub fn column_for_path(&self, path: &str) -> Option<&ColumnMetadata> {
        self.by_path.get(path)
    }
}

/// Identity of an entity type plus the means to describe it.
///
/// Lets declarations refer to a table without resolving it yet.
#[derive(Clone, Copy)]
pub struct TableKey {
    type_id: TypeId,
    type_name: &'static str,
    describe: fn() -> TableDescriptor,
}

impl TableKey {
    pub fn of<E: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            describe: E::describe,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Run the entity's description
    pub fn describe(&self) -> TableDescriptor {
        (self.describe)()
    }
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TableKey {}

impl Hash for TableKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TableKey").field(&self.type_name).finish()
    }
}

/// Source of table metadata for entity types.
pub trait TableMetadataProvider: Send + Sync {
    /// Resolve the table metadata of the entity identified by `key`
    fn table_metadata(&self, key: &TableKey) -> MappingResult<Arc<TableMetadata>>;

    /// Resolve the table metadata of `E`
    fn metadata_for<E: Entity>(&self) -> MappingResult<Arc<TableMetadata>>
    where
        Self: Sized,
    {
        self.table_metadata(&TableKey::of::<E>())
    }
}

/// Process-wide cache of resolved table metadata, keyed by entity type.
///
/// Create one at startup and share it by reference; reads take a shared
/// lock. On a miss the write lock is held while the entity is described, so
/// each type is resolved by exactly one writer and every caller observes the
/// same `Arc`. Failed resolutions are not cached.
#[derive(Debug, Default)]
pub struct MetadataCache {
    tables: RwLock<HashMap<TypeId, Arc<TableMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resolved types
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TableMetadataProvider for MetadataCache {
    fn table_metadata(&self, key: &TableKey) -> MappingResult<Arc<TableMetadata>> {
        if let Some(found) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key.type_id())
        {
            return Ok(Arc::clone(found));
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have resolved the type while we waited
        if let Some(found) = tables.get(&key.type_id()) {
            return Ok(Arc::clone(found));
        }

        let metadata = Arc::new(TableMetadata::from_descriptor(
            key.type_name(),
            key.describe(),
        )?);
        log::debug!(
            "Resolved table metadata for {}: table '{}', {} columns",
            key.type_name(),
            metadata.name(),
            metadata.columns().len()
        );
        tables.insert(key.type_id(), Arc::clone(&metadata));
        Ok(metadata)
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;

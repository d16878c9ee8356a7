//! Table existence probe

use crate::error::QueryResult;
use relq_core::{Dialect, Entity, TableKey, TableMetadataProvider};

/// Statement whose scalar result is nonzero iff `E`'s table exists
pub fn table_exists_statement<E: Entity>(
    provider: &dyn TableMetadataProvider,
    dialect: &dyn Dialect,
) -> QueryResult<String> {
    let table = provider.table_metadata(&TableKey::of::<E>())?;
    Ok(dialect.table_exists_probe(table.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relq_core::{entity, MetadataCache, SqlServerDialect, TableDescriptor};

    entity! {
        pub struct Product in "Product" key id {
            pub id: i32 => "ID",
        }
    }

    struct Unmapped;

    impl Entity for Unmapped {
        fn describe() -> TableDescriptor {
            TableDescriptor::new("Unmapped", "id")
        }
    }

    #[test]
    fn test_probe_for_entity() {
        let cache = MetadataCache::new();
        let sql = table_exists_statement::<Product>(&cache, &SqlServerDialect).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = 'Product'"
        );
    }

    #[test]
    fn test_probe_for_unmapped_entity() {
        let cache = MetadataCache::new();
        let err = table_exists_statement::<Unmapped>(&cache, &SqlServerDialect).unwrap_err();
        assert!(matches!(err, crate::QueryError::Mapping(_)));
    }
}

//! Entity declarations and typed field keys
//!
//! An [`Entity`] is a record type mapped to one table. Columns are referenced
//! through [`Field`] keys, which carry the owning entity and the value type
//! at the type level and the property path at runtime. The property path is
//! what [`TableMetadata`](crate::TableMetadata) indexes columns by.

use crate::metadata::TableDescriptor;
use std::fmt;
use std::marker::PhantomData;

/// A record type mapped to a table.
pub trait Entity: 'static {
    /// Describe the table this type maps to.
    ///
    /// Must be a pure function of the type: the result is memoized by
    /// [`MetadataCache`](crate::MetadataCache).
    fn describe() -> TableDescriptor;
}

/// Resolve a typed property reference to its entity and dotted property path.
pub trait MemberPath {
    /// The entity that owns the property
    type Entity: Entity;

    /// Dotted property path, e.g. `customer_id` or `address.city`
    fn member_path(&self) -> &str;
}

/// Typed key for a property of `E` holding values of type `V`.
pub struct Field<E, V> {
    path: &'static str,
    _marker: PhantomData<fn() -> (E, V)>,
}

impl<E, V> Field<E, V> {
    /// Create a key for the property at `path`.
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Property path this key refers to
    pub const fn path(&self) -> &'static str {
        self.path
    }
}

impl<E, V> Clone for Field<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Field<E, V> {}

impl<E, V> fmt::Debug for Field<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field<{}>({})", std::any::type_name::<E>(), self.path)
    }
}

impl<E: Entity, V> MemberPath for Field<E, V> {
    type Entity = E;

    fn member_path(&self) -> &str {
        self.path
    }
}

/// Declare a record struct together with its [`Entity`] mapping.
///
/// Every property gets a typed [`Field`] constant of the same name, so
/// `Order::customer_id` is the key for the `customer_id` property. A
/// property maps to a column of the same name unless `=> "Column"` is given.
///
/// ```
/// relq_core::entity! {
///     #[derive(Debug, Clone)]
///     pub struct Customer in "Customer" key id {
///         pub id: i32 => "ID",
///         pub name: String => "Name",
///         pub phone: Option<String>,
///     }
/// }
///
/// use relq_core::Entity;
/// let table = Customer::describe();
/// assert_eq!(table.table, "Customer");
/// assert_eq!(Customer::name.path(), "name");
/// ```
#[macro_export]
macro_rules! entity {
    (@column $field:ident) => {
        stringify!($field)
    };
    (@column $field:ident => $column:literal) => {
        $column
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident in $table:literal key $pk:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $column:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $Name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        #[allow(non_upper_case_globals)]
        impl $Name {
            $(
                #[doc = concat!("Key for the `", stringify!($field), "` property")]
                pub const $field: $crate::Field<$Name, $fty> = $crate::Field::new(stringify!($field));
            )*
        }

        impl $crate::Entity for $Name {
            fn describe() -> $crate::TableDescriptor {
                $crate::TableDescriptor::new($table, stringify!($pk))
                    $(
                        .column($crate::ColumnDescriptor::of::<$fty>(
                            stringify!($field),
                            $crate::entity!(@column $field $(=> $column)?),
                        ))
                    )*
            }
        }
    };
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;

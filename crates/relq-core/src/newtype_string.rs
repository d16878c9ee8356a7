//! Macro for SQL identifier newtypes.
//!
//! Table and column names share one invariant (non-empty) and one set of
//! conversions, so both are generated from a single macro.

/// Define a non-empty identifier newtype.
///
/// Generates the struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd,
/// Ord`, serde support through `TryFrom<String>`/`Into<String>`, plus
/// `try_new()`, `as_str()`, `Display`, `AsRef<str>`, `Deref<Target=str>`,
/// `Borrow<str>` and comparisons against `str`.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        $vis struct $Name(String);

        impl $Name {
            /// Create an identifier, returning `None` when `name` is empty.
            pub fn try_new(name: impl Into<String>) -> Option<Self> {
                let s = name.into();
                if s.is_empty() { None } else { Some(Self(s)) }
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $Name {
            type Error = String;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::try_new(s).ok_or_else(|| concat!(stringify!($Name), " must not be empty").to_string())
            }
        }

        impl From<$Name> for String {
            fn from(name: $Name) -> Self {
                name.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;

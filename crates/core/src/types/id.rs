//! Newtype IDs for type-safe record references.
//!
//! The portal API is not consistent about ID encoding: some endpoints return
//! numeric IDs, others return strings. IDs are therefore stored as their
//! textual form and accept either JSON numbers or strings when decoded.

use serde::{Deserialize, Deserializer};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` accepting JSON strings and numbers
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `From<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use school_portal_core::define_id;
/// define_id!(LockerId);
/// define_id!(BusRouteId);
///
/// let locker = LockerId::from(7);
/// assert_eq!(locker.as_str(), "7");
///
/// // These are different types, so this won't compile:
/// // let _: LockerId = BusRouteId::new("7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its textual form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_raw_id(deserializer).map(Self)
            }
        }
    };
}

/// Either encoding an API may use for an ID.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Decode an ID from a JSON string or number into its textual form.
///
/// Used by [`define_id!`]; public only so the macro can reach it.
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither a string nor a number.
pub fn deserialize_raw_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

define_id!(ClassId);
define_id!(SubjectId);
define_id!(AssignmentId);
define_id!(NoteId);
define_id!(CbtId);
define_id!(ReportId);

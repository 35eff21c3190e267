//! Newtype identifiers for members of the enterprise client's interface.
//!
//! Operation, type, and field names are all plain strings on the wire, but they
//! name different kinds of interface member. Wrapping each one prevents, for
//! example, an [`OperationName`] being reported where a [`FieldName`] was meant.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and
// serde conversions that reject empty values on input.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdentifier(stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// An identifier was empty where a name is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} must not be empty")]
pub struct EmptyIdentifier(&'static str);

// ---------------------------------------------------------------------------
// Interface members
// ---------------------------------------------------------------------------

string_id! {
    /// Names an operation exposed by the enterprise client (e.g. `"upload_package"`).
    OperationName
}

impl OperationName {
    /// Builds an operation name from a compile-time literal.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(!value.is_empty());
        Self(value.to_owned())
    }
}

string_id! {
    /// Names a type the enterprise client is expected to provide.
    TypeName
}

string_id! {
    /// Names a field or member of a type provided by the enterprise client.
    FieldName
}

// ---------------------------------------------------------------------------
// Invocation correlation
// ---------------------------------------------------------------------------

/// Identifies a single cross-boundary invocation.
///
/// Generated fresh for every call and attached to the tracing span, so that the
/// warning for a structural failure and the debug-level cause can be correlated
/// in the build log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Newtype wrappers for host registry identifiers
//!
//! Class, struct and enum identifiers are the host's canonical names
//! (e.g. `/Script/Engine.Actor`, `Vector`, `ECollisionChannel`). Equality is plain
//! string equality, which is what makes two resolutions of the same signature
//! structurally equal.

use std::borrow::Borrow;
use std::ops::Deref;

use serde::Deserialize;
use serde::Serialize;

macro_rules! registry_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str { &self.0 }

            /// Get the short name (last segment after `.` or `/`)
            #[must_use]
            pub fn short_name(&self) -> &str {
                self.0.rsplit(['.', '/']).next().unwrap_or(&self.0)
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target { &self.0 }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self { Self(s.to_string()) }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self { Self(s) }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self { id.0 }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

registry_identifier!(
    /// Identifier of a class in the host's class registry
    ClassId
);

registry_identifier!(
    /// Identifier of a struct in the host's struct registry
    StructId
);

registry_identifier!(
    /// Identifier of an enum in the host's enum registry
    EnumId
);

// SPDX-License-Identifier: AGPL-3.0-or-later

//! String identifiers for the different entities.
//!
//! Identifiers are opaque strings. New ones are random UUIDs (version 4) rendered in their
//! canonical hyphenated form, which is what the hosted backend used as well.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Returns a new random UUID (version 4) string.
pub(crate) fn random_uuid() -> String {
    Uuid::new_v4().to_string()
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns a new random identifier.
            pub fn random() -> Self {
                Self(random_uuid())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_owned()))
            }
        }
    };
}

identifier!(
    /// Identifier of a record header.
    RecordId
);

identifier!(
    /// Identifier of a workspace (tenant).
    WorkspaceId
);

identifier!(
    /// Identifier of a persisted view.
    ViewId
);

identifier!(
    /// Identifier of a field definition.
    FieldId
);

identifier!(
    /// Identifier of a user, handed to us by the authentication layer.
    UserId
);

// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::db::errors::{
    FieldStorageError, RecordStorageError, ViewStorageError, WorkspaceStorageError,
};
use crate::form::FormError;
use crate::identifier::ViewId;
use crate::record::RecordType;
use crate::view::SessionError;

/// Error returned when a string does not name a variant of one of the stored enumerations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }

    /// The string which could not be parsed.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Represents all the ways a dashboard operation can fail.
#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    /// Error returned from the record store.
    #[error(transparent)]
    RecordStorage(#[from] RecordStorageError),

    /// Error returned from the field definition store.
    #[error(transparent)]
    FieldStorage(#[from] FieldStorageError),

    /// Error returned from the view store.
    #[error(transparent)]
    ViewStorage(#[from] ViewStorageError),

    /// Error returned from the workspace store.
    #[error(transparent)]
    WorkspaceStorage(#[from] WorkspaceStorageError),

    /// Submitted form did not pass validation, nothing was written.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Interactive edit of a view was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Storage holds no field definitions for this record type, it was probably never seeded.
    #[error("No field definitions found for record type {0}")]
    MissingFieldDefinitions(RecordType),

    /// Requested view belongs to a different workspace or record type.
    #[error("View {0} does not belong to this workspace and record type")]
    ViewMismatch(ViewId),

    /// View names can not be empty.
    #[error("View name can not be empty")]
    EmptyViewName,
}

#[cfg(test)]
mod tests {
    use super::ParseEnumError;

    #[test]
    fn parse_enum_error_message() {
        let error = ParseEnumError::new("record type", "events");
        assert_eq!(error.to_string(), "Unknown record type 'events'");
        assert_eq!(error.value(), "events");
    }
}

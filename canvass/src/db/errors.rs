// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::identifier::{RecordId, UserId, ViewId, WorkspaceId};
use crate::record::RecordType;

/// `RecordStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum RecordStorageError {
    /// Catch all error which implementers can use for passing their own errors up the chain.
    #[error("Error occured in RecordStore: {0}")]
    Custom(String),

    /// Workspace of the new record does not exist.
    #[error("Workspace {0} not found")]
    UnknownWorkspace(WorkspaceId),

    /// A record referenced by the new record does not exist in its workspace.
    #[error("Linked {record_type} record {id} not found in this workspace")]
    LinkedRecordNotFound {
        record_type: RecordType,
        id: RecordId,
    },

    /// Stored row could not be turned into a record.
    #[error("Invalid record row {id}: {reason}")]
    InvalidRow { id: String, reason: String },
}

/// `FieldStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum FieldStorageError {
    /// Catch all error which implementers can use for passing their own errors up the chain.
    #[error("Error occured in FieldStore: {0}")]
    Custom(String),
}

/// `ViewStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum ViewStorageError {
    /// Catch all error which implementers can use for passing their own errors up the chain.
    #[error("Error occured in ViewStore: {0}")]
    Custom(String),

    /// No view with this identifier exists.
    #[error("View {0} not found")]
    NotFound(ViewId),

    /// The view was saved by someone else since it was loaded.
    #[error("View {id} was changed concurrently, expected version {expected} but found {actual}")]
    VersionConflict {
        id: ViewId,
        expected: i64,
        actual: i64,
    },

    /// Stored settings are not valid JSON for view settings.
    #[error("Invalid view settings: {0}")]
    InvalidSettings(String),
}

/// `WorkspaceStore` errors.
#[derive(thiserror::Error, Debug)]
pub enum WorkspaceStorageError {
    /// Catch all error which implementers can use for passing their own errors up the chain.
    #[error("Error occured in WorkspaceStore: {0}")]
    Custom(String),

    /// No workspace with this identifier exists.
    #[error("Workspace {0} not found")]
    NotFound(WorkspaceId),

    /// User has no membership in this workspace.
    #[error("User {user} is not a member of workspace {workspace}")]
    NotAMember { user: UserId, workspace: WorkspaceId },
}

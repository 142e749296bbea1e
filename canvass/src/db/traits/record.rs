// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;

use crate::db::errors::RecordStorageError;
use crate::identifier::WorkspaceId;
use crate::record::{NewRecord, Record, RecordType};

/// Storage trait for polymorphic records.
#[async_trait]
pub trait RecordStore {
    /// Returns all records of one type in a workspace, ordered by creation time and id.
    ///
    /// Records are assembled from their header, their typed payload and all their contact
    /// methods. Headers without a typed payload are never returned.
    async fn get_records(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<Record>, RecordStorageError>;

    /// Persists a new record atomically.
    ///
    /// Either the header, the typed payload and all contact methods are written or nothing is.
    /// Linked records need to exist in the same workspace and have the expected record type.
    async fn create_record(&self, record: &NewRecord) -> Result<Record, RecordStorageError>;
}

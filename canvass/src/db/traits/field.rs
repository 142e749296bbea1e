// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;

use crate::db::errors::FieldStorageError;
use crate::field::FieldDefinition;
use crate::record::RecordType;

/// Storage trait for field definitions.
#[async_trait]
pub trait FieldStore {
    /// Returns the field definitions of a record type, ordered by their position.
    async fn get_field_definitions(
        &self,
        record_type: RecordType,
    ) -> Result<Vec<FieldDefinition>, FieldStorageError>;

    /// Inserts field definitions, skipping all which already exist.
    ///
    /// Returns the number of inserted definitions.
    async fn insert_field_definitions(
        &self,
        fields: &[FieldDefinition],
    ) -> Result<u64, FieldStorageError>;
}

// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;

use crate::db::errors::ViewStorageError;
use crate::identifier::{ViewId, WorkspaceId};
use crate::record::RecordType;
use crate::view::{View, ViewSettings};

/// Storage trait for saved views.
#[async_trait]
pub trait ViewStore {
    /// Returns all views of one record type in a workspace, oldest first.
    async fn get_views(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<View>, ViewStorageError>;

    /// Returns the view with the given id.
    async fn get_view(&self, id: &ViewId) -> Result<Option<View>, ViewStorageError>;

    /// Persists a new view with version 1.
    async fn create_view(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        name: &str,
        settings: &ViewSettings,
    ) -> Result<View, ViewStorageError>;

    /// Replaces the settings of a view and increments its version.
    ///
    /// Without an expected version the last write wins. With an expected version the update
    /// fails with [`ViewStorageError::VersionConflict`] when the stored version differs.
    async fn update_view_settings(
        &self,
        id: &ViewId,
        settings: &ViewSettings,
        expected_version: Option<i64>,
    ) -> Result<View, ViewStorageError>;
}

// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;

use crate::db::errors::WorkspaceStorageError;
use crate::identifier::{UserId, WorkspaceId};
use crate::workspace::{NewWorkspace, Workspace, WorkspaceRole};

/// Storage trait for workspaces, their members and the workspace each user has selected.
#[async_trait]
pub trait WorkspaceStore {
    /// Creates a workspace, makes the user its owner and selects it for them.
    async fn create_workspace(
        &self,
        workspace: &NewWorkspace,
        owner: &UserId,
    ) -> Result<Workspace, WorkspaceStorageError>;

    /// Returns the workspace with the given id.
    async fn get_workspace(
        &self,
        id: &WorkspaceId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError>;

    /// Returns all workspaces the user is a member of, together with their role.
    async fn get_workspaces_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<(Workspace, WorkspaceRole)>, WorkspaceStorageError>;

    /// Stores the selected workspace of a user, who needs to be a member of it.
    async fn select_workspace(
        &self,
        user: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<(), WorkspaceStorageError>;

    /// Returns the workspace the user selected last.
    async fn get_selected_workspace(
        &self,
        user: &UserId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError>;
}

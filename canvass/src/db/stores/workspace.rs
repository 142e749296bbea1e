// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use log::{debug, info};
use sqlx::{query, query_as, query_scalar};

use crate::db::errors::WorkspaceStorageError;
use crate::db::models::{WorkspaceMemberRow, WorkspaceRow};
use crate::db::traits::WorkspaceStore;
use crate::db::utils::{now_millis, workspace_from_row};
use crate::db::SqlStore;
use crate::errors::ParseEnumError;
use crate::identifier::{UserId, WorkspaceId};
use crate::workspace::{NewWorkspace, Workspace, WorkspaceRole};

#[async_trait]
impl WorkspaceStore for SqlStore {
    /// Inserts the workspace, the owner membership and the selection of the owner in one
    /// transaction.
    async fn create_workspace(
        &self,
        workspace: &NewWorkspace,
        owner: &UserId,
    ) -> Result<Workspace, WorkspaceStorageError> {
        let workspace = workspace
            .clone()
            .into_workspace(WorkspaceId::random(), now_millis());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        query(
            "
            INSERT INTO
                workspaces (
                    id,
                    name,
                    workspace_type,
                    state,
                    county,
                    race,
                    created_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(workspace.id.as_str())
        .bind(&workspace.name)
        .bind(workspace.workspace_type.as_str())
        .bind(&workspace.state)
        .bind(workspace.county.as_deref())
        .bind(workspace.race.as_deref())
        .bind(workspace.created_at)
        .execute(&mut tx)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        query(
            "
            INSERT INTO
                workspace_users (
                    workspace_id,
                    user_id,
                    role
                )
            VALUES
                ($1, $2, $3)
            ",
        )
        .bind(workspace.id.as_str())
        .bind(owner.as_str())
        .bind(WorkspaceRole::Owner.as_str())
        .execute(&mut tx)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        upsert_selection(&mut tx, owner, &workspace.id).await?;

        tx.commit()
            .await
            .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        info!("Created workspace {} for user {}", workspace.id, owner);

        Ok(workspace)
    }

    async fn get_workspace(
        &self,
        id: &WorkspaceId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError> {
        let row = query_as::<_, WorkspaceRow>(
            "
            SELECT
                id,
                name,
                workspace_type,
                state,
                county,
                race,
                created_at
            FROM
                workspaces
            WHERE
                id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        row.map(workspace_from_row).transpose()
    }

    async fn get_workspaces_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<(Workspace, WorkspaceRole)>, WorkspaceStorageError> {
        let rows = query_as::<_, WorkspaceMemberRow>(
            "
            SELECT
                workspaces.id,
                workspaces.name,
                workspaces.workspace_type,
                workspaces.state,
                workspaces.county,
                workspaces.race,
                workspaces.created_at,
                workspace_users.role
            FROM
                workspaces
            INNER JOIN workspace_users
                ON workspace_users.workspace_id = workspaces.id
            WHERE
                workspace_users.user_id = $1
            ORDER BY
                workspaces.created_at, workspaces.id
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let (workspace, role) = row.into_parts();
                let role = role
                    .parse()
                    .map_err(|e: ParseEnumError| WorkspaceStorageError::Custom(e.to_string()))?;

                Ok((workspace_from_row(workspace)?, role))
            })
            .collect()
    }

    async fn select_workspace(
        &self,
        user: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<(), WorkspaceStorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        let membership = query_scalar::<_, String>(
            "
            SELECT
                role
            FROM
                workspace_users
            WHERE
                workspace_id = $1
                AND user_id = $2
            ",
        )
        .bind(workspace_id.as_str())
        .bind(user.as_str())
        .fetch_optional(&mut tx)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        if membership.is_none() {
            return Err(WorkspaceStorageError::NotAMember {
                user: user.clone(),
                workspace: workspace_id.clone(),
            });
        }

        upsert_selection(&mut tx, user, workspace_id).await?;

        tx.commit()
            .await
            .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        debug!("User {} selected workspace {}", user, workspace_id);

        Ok(())
    }

    async fn get_selected_workspace(
        &self,
        user: &UserId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError> {
        let row = query_as::<_, WorkspaceRow>(
            "
            SELECT
                workspaces.id,
                workspaces.name,
                workspaces.workspace_type,
                workspaces.state,
                workspaces.county,
                workspaces.race,
                workspaces.created_at
            FROM
                user_settings
            INNER JOIN workspaces
                ON workspaces.id = user_settings.selected_workspace_id
            WHERE
                user_settings.user_id = $1
            ",
        )
        .bind(user.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

        row.map(workspace_from_row).transpose()
    }
}

async fn upsert_selection(
    tx: &mut sqlx::Transaction<'_, sqlx::Any>,
    user: &UserId,
    workspace_id: &WorkspaceId,
) -> Result<(), WorkspaceStorageError> {
    query(
        "
        INSERT INTO
            user_settings (
                user_id,
                selected_workspace_id
            )
        VALUES
            ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            selected_workspace_id = excluded.selected_workspace_id
        ",
    )
    .bind(user.as_str())
    .bind(workspace_id.as_str())
    .execute(tx)
    .await
    .map_err(|e| WorkspaceStorageError::Custom(e.to_string()))?;

    Ok(())
}

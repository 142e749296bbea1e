// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `workspaces` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRow {
    pub id: String,
    pub name: String,

    /// One of `state_party`, `county_party` or `campaign`.
    pub workspace_type: String,

    pub state: String,
    pub county: Option<String>,
    pub race: Option<String>,
    pub created_at: i64,
}

/// A `workspaces` row joined with the role of one member from `workspace_users`.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceMemberRow {
    pub id: String,
    pub name: String,
    pub workspace_type: String,
    pub state: String,
    pub county: Option<String>,
    pub race: Option<String>,
    pub created_at: i64,

    /// One of `owner`, `admin` or `member`.
    pub role: String,
}

impl WorkspaceMemberRow {
    /// Splits the row into the workspace and the role.
    pub fn into_parts(self) -> (WorkspaceRow, String) {
        (
            WorkspaceRow {
                id: self.id,
                name: self.name,
                workspace_type: self.workspace_type,
                state: self.state,
                county: self.county,
                race: self.race,
                created_at: self.created_at,
            },
            self.role,
        )
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `views` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: String,
    pub workspace_id: String,
    pub record_type_id: String,
    pub name: String,

    /// View settings encoded as JSON.
    pub settings: String,

    /// Incremented with every saved change of the settings.
    pub version: i64,
}

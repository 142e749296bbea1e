// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Representation of a row from the `field_definitions` table as stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinitionRow {
    /// Identifier of the field definition.
    pub id: String,

    /// Stable identifier of the record type this field belongs to.
    pub record_type_id: String,

    /// Key used in view settings and forms.
    pub field_key: String,

    /// Display name.
    pub name: String,

    /// Value type, for example `text` or `email`.
    pub field_type: String,

    pub is_multiple: bool,

    pub is_required: bool,

    /// Slug of the record type referenced by `linked_record` fields.
    pub linked_record_type: Option<String>,

    /// Position of the field in forms and default column order.
    pub list_index: i64,
}

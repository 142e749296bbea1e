// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::{FieldDefinition, FieldKey, FieldKind};
use crate::record::Record;
use crate::view::projection::{project, CellValue};
use crate::view::ViewSettings;

/// One rendered column of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Parsed key of the field shown in this column.
    pub key: FieldKey,

    /// Column header, the display name of the field.
    pub header: String,

    /// Value type of the field.
    pub kind: FieldKind,

    /// Flag indicating if rows can be sorted by this column.
    ///
    /// Multi-valued fields have no single value to order by.
    pub sortable: bool,
}

impl Column {
    /// Key of the field as it is used in view settings.
    pub fn field(&self) -> &str {
        self.key.as_str()
    }

    /// Display value of this column for the given record.
    pub fn render(&self, record: &Record) -> CellValue {
        project(record, &self.key)
    }
}

impl From<&FieldDefinition> for Column {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            key: field.field_key(),
            header: field.name.clone(),
            kind: field.kind,
            sortable: !field.is_multiple,
        }
    }
}

/// Columns of a view, in the order of its visible fields.
///
/// Keys without a matching field definition and repeated keys are skipped.
pub fn columns(fields: &[FieldDefinition], settings: &ViewSettings) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::with_capacity(settings.visible_fields.len());

    for key in &settings.visible_fields {
        if columns.iter().any(|column| column.field() == key) {
            continue;
        }

        if let Some(field) = fields.iter().find(|field| &field.key == key) {
            columns.push(Column::from(field));
        }
    }

    columns
}

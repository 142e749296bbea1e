// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::FieldDefinition;
use crate::identifier::RecordId;
use crate::record::Record;
use crate::view::column::{columns, Column};
use crate::view::filter::apply_filters;
use crate::view::projection::CellValue;
use crate::view::{SortState, ViewSettings};

/// One rendered row, holding a cell for every column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub record_id: RecordId,
    pub cells: Vec<CellValue>,
}

/// Records rendered through a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Returns true if no record passed the filters.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders records into a table.
///
/// Records are filtered first, then ordered by the sort state and finally projected into the
/// columns of the visible fields. The given records are not modified.
pub fn render_table(
    records: &[Record],
    fields: &[FieldDefinition],
    settings: &ViewSettings,
    sort: &SortState,
) -> Table {
    let columns = columns(fields, settings);

    let mut filtered = apply_filters(records, &settings.filters);
    sort.apply(&mut filtered);

    let rows = filtered
        .into_iter()
        .map(|record| TableRow {
            record_id: record.id.clone(),
            cells: columns.iter().map(|column| column.render(record)).collect(),
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use crate::field::builtin_field_definitions;
    use crate::record::{Contact, ContactMethods, Record, RecordType};
    use crate::view::projection::CellValue;
    use crate::view::{FilterItem, Operator, SortState, ViewSettings};

    use super::render_table;

    fn contact(id: &str, first_name: &str, last_name: &str) -> Record {
        Record {
            id: id.into(),
            workspace_id: "ws".into(),
            created_at: 0,
            payload: Contact::new(first_name, last_name).into(),
            contact_methods: ContactMethods::default(),
        }
    }

    #[test]
    fn filter_sort_and_project() {
        let fields = builtin_field_definitions(RecordType::Contacts);
        let records = vec![
            contact("1", "Grace", "Hopper"),
            contact("2", "Ada", "Lovelace"),
            contact("3", "Alan", "Turing"),
        ];

        let settings = ViewSettings {
            visible_fields: vec!["last_name".into(), "first_name".into()],
            filters: vec![FilterItem::new("first_name", Operator::StartsWith, "a")],
            sorts: Vec::new(),
        };

        let mut sort = SortState::new();
        sort.toggle("last_name");
        sort.toggle("last_name");

        let table = render_table(&records, &fields, &settings, &sort);

        let headers: Vec<&str> = table.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Last Name", "First Name"]);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].record_id.as_str(), "3");
        assert_eq!(
            table.rows[0].cells,
            vec![
                CellValue::Text("Turing".into()),
                CellValue::Text("Alan".into())
            ]
        );
        assert_eq!(table.rows[1].record_id.as_str(), "2");

        // Input order is untouched
        assert_eq!(records[0].id.as_str(), "1");
    }

    #[test]
    fn render_without_records() {
        let fields = builtin_field_definitions(RecordType::Contacts);
        let settings = ViewSettings::all_visible(&fields);
        let table = render_table(&[], &fields, &settings, &SortState::new());

        assert!(table.is_empty());
        assert_eq!(table.columns.len(), fields.len());
    }
}

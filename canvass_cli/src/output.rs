// SPDX-License-Identifier: AGPL-3.0-or-later

use canvass::view::Table;
use canvass::workspace::WorkspaceRole;
use canvass::{FieldDefinition, ViewSession, Workspace};
use colored::Colorize;

/// Pads text with whitespace to the given width, counting characters and not bytes.
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(padding))
}

/// Renders rows as aligned text columns, the record id first.
pub fn format_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return "No visible fields".into();
    }

    if table.is_empty() {
        return "No records".into();
    }

    let mut headers = vec!["ID".to_string()];
    headers.extend(table.columns.iter().map(|column| column.header.clone()));

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.record_id.to_string()];
            cells.extend(row.cells.iter().map(ToString::to_string));
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<String>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(&headers).bold().to_string()];
    lines.extend(rows.iter().map(|row| format_line(row)));
    lines.join("\n")
}

/// Lists field definitions with key, name and kind.
pub fn format_fields(fields: &[FieldDefinition]) -> String {
    fields
        .iter()
        .map(|field| {
            let mut flags = Vec::new();

            if field.is_required {
                flags.push("required".to_string());
            }

            if field.is_multiple {
                flags.push("multiple".to_string());
            }

            if let Some(linked_record_type) = field.linked_record_type {
                flags.push(format!("links {}", linked_record_type));
            }

            format!(
                "{} {} ({}) {}",
                field.key.bold(),
                field.name,
                field.kind,
                flags.join(", ").dimmed()
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// One line describing a workspace.
pub fn format_workspace(workspace: &Workspace, role: Option<WorkspaceRole>) -> String {
    let role = role
        .map(|role| format!(" [{}]", role))
        .unwrap_or_default();

    format!(
        "{} {} - {}{}",
        workspace.id.to_string().dimmed(),
        workspace.name.bold(),
        workspace.subtitle(),
        role
    )
}

/// Describes the view of a session with its columns, filters and ordering.
pub fn format_view(session: &ViewSession) -> String {
    let view = session.view();
    let settings = session.settings();

    let id = match &view.id {
        Some(id) => id.to_string(),
        None => "not saved".into(),
    };

    let columns = session
        .columns()
        .iter()
        .map(|column| column.field().to_string())
        .collect::<Vec<String>>()
        .join(", ");

    let mut lines = vec![
        format!("{} ({}, version {})", view.name.bold(), id.dimmed(), view.version),
        format!("Columns: {}", columns),
    ];

    for filter in &settings.filters {
        lines.push(format!(
            "Filter {}: {} {} '{}'",
            filter.id.dimmed(),
            filter.field,
            filter.operator,
            filter.value
        ));
    }

    if let (Some(field), Some(direction)) = (session.sort().field(), session.sort().direction()) {
        lines.push(format!("Sort: {} {}", field, direction));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use canvass::field::builtin_field_definitions;
    use canvass::view::{render_table, SortState, ViewSettings};
    use canvass::RecordType;

    use super::{format_fields, format_table, pad};

    #[test]
    fn pad_counts_characters() {
        assert_eq!(pad("Zoë", 5), "Zoë  ");
        assert_eq!(pad("Lovelace", 3), "Lovelace");
    }

    #[test]
    fn empty_tables() {
        let fields = builtin_field_definitions(RecordType::Contacts);

        let table = render_table(
            &[],
            &fields,
            &ViewSettings::all_visible(&fields),
            &SortState::new(),
        );
        assert_eq!(format_table(&table), "No records");

        let table = render_table(&[], &fields, &ViewSettings::default(), &SortState::new());
        assert_eq!(format_table(&table), "No visible fields");
    }

    #[test]
    fn fields_list_flags() {
        colored::control::set_override(false);

        let output = format_fields(&builtin_field_definitions(RecordType::Donations));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "amount Amount (number) required");
        assert_eq!(lines[1], "status Status (donation_status)");
        assert_eq!(lines[2], "contact_id Contact (linked_record) links contacts");
    }
}

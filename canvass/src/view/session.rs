// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::FieldDefinition;
use crate::record::Record;
use crate::view::column::{columns, Column};
use crate::view::table::{render_table, Table};
use crate::view::{FilterItem, Operator, SortState, View, ViewSettings};

/// Errors of interactive view edits.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Record type has no field with this key.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// View has no filter with this identifier.
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    /// Field is not a visible, single-valued column.
    #[error("Can not sort by field '{0}'")]
    NotSortable(String),
}

/// Partial change of a filter, unset members keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub field: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<String>,
}

/// The selected view of one record type together with its unsaved edits.
///
/// All edits only change the in-memory settings, persisting them is up to the caller.
#[derive(Debug, Clone)]
pub struct ViewSession {
    view: View,
    fields: Vec<FieldDefinition>,
    sort: SortState,
}

impl ViewSession {
    /// Opens a session on the given view, restoring its saved sort order.
    pub fn new(view: View, fields: Vec<FieldDefinition>) -> Self {
        let sort = SortState::from_settings(&view.settings);
        Self { view, fields, sort }
    }

    /// Currently selected view, including unsaved edits.
    pub fn view(&self) -> &View {
        &self.view
    }

    pub(crate) fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Settings of the selected view.
    pub fn settings(&self) -> &ViewSettings {
        &self.view.settings
    }

    /// Field definitions of the record type shown in this session.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Active ordering.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Columns of the visible fields.
    pub fn columns(&self) -> Vec<Column> {
        columns(&self.fields, &self.view.settings)
    }

    /// Switches to another view of the same record type, discarding unsaved edits.
    pub fn select(&mut self, view: View) {
        self.sort = SortState::from_settings(&view.settings);
        self.view = view;
    }

    /// Hides a visible field or shows a hidden one.
    ///
    /// Fields which are shown again are appended at the end. Hiding the sorted field clears the
    /// ordering. Returns true if the field is visible afterwards.
    pub fn toggle_field(&mut self, key: &str) -> Result<bool, SessionError> {
        if !self.fields.iter().any(|field| field.key == key) {
            return Err(SessionError::UnknownField(key.to_owned()));
        }

        let visible_fields = &mut self.view.settings.visible_fields;

        if visible_fields.iter().any(|visible| visible == key) {
            visible_fields.retain(|visible| visible != key);

            if self.sort.field() == Some(key) {
                self.sort = SortState::new();
                self.view.settings.sorts.clear();
            }

            Ok(false)
        } else {
            visible_fields.push(key.to_owned());
            Ok(true)
        }
    }

    /// Appends a new filter on the first visible column, comparing with `equals` against an
    /// empty value.
    pub fn add_filter(&mut self) -> &FilterItem {
        let field = self
            .columns()
            .first()
            .map(|column| column.field().to_owned())
            .unwrap_or_default();

        let filters = &mut self.view.settings.filters;
        filters.push(FilterItem::new(&field, Operator::Equals, ""));

        &filters[filters.len() - 1]
    }

    /// Changes parts of the filter with the given identifier.
    pub fn update_filter(&mut self, id: &str, update: FilterUpdate) -> Result<(), SessionError> {
        if let Some(field) = &update.field {
            if !field.is_empty() && !self.fields.iter().any(|known| &known.key == field) {
                return Err(SessionError::UnknownField(field.clone()));
            }
        }

        let filter = self
            .view
            .settings
            .filters
            .iter_mut()
            .find(|filter| filter.id == id)
            .ok_or_else(|| SessionError::UnknownFilter(id.to_owned()))?;

        if let Some(field) = update.field {
            filter.field = field;
        }

        if let Some(operator) = update.operator {
            filter.operator = operator;
        }

        if let Some(value) = update.value {
            filter.value = value;
        }

        Ok(())
    }

    /// Removes the filter with the given identifier.
    pub fn remove_filter(&mut self, id: &str) -> Result<(), SessionError> {
        let filters = &mut self.view.settings.filters;
        let count = filters.len();
        filters.retain(|filter| filter.id != id);

        if filters.len() == count {
            return Err(SessionError::UnknownFilter(id.to_owned()));
        }

        Ok(())
    }

    /// Replaces all filters at once.
    pub fn set_filters(&mut self, filters: Vec<FilterItem>) {
        self.view.settings.filters = filters;
    }

    /// Advances the ordering for the given field and mirrors it into the view settings.
    pub fn toggle_sort(&mut self, key: &str) -> Result<(), SessionError> {
        let sortable = self
            .columns()
            .iter()
            .any(|column| column.field() == key && column.sortable);

        if !sortable {
            return Err(SessionError::NotSortable(key.to_owned()));
        }

        self.sort.toggle(key);
        self.view.settings.sorts = self.sort.to_sorts();

        Ok(())
    }

    /// Renders records through the selected view.
    pub fn render(&self, records: &[Record]) -> Table {
        render_table(records, &self.fields, &self.view.settings, &self.sort)
    }
}

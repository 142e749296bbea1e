// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::field::FieldDefinition;
use crate::identifier::random_uuid;

text_enum! {
    /// Comparison applied by a filter.
    Operator ("filter operator") {
        /// Display value equals the filter value.
        Equals => "equals",

        /// Display value contains the filter value.
        Contains => "contains",

        /// Display value starts with the filter value.
        StartsWith => "startsWith",

        /// Display value ends with the filter value.
        EndsWith => "endsWith",

        /// Display value is empty, the filter value is ignored.
        IsEmpty => "isEmpty",

        /// Display value is not empty, the filter value is ignored.
        IsNotEmpty => "isNotEmpty",
    }
}

impl Operator {
    /// Returns true for operators which do not compare against a filter value.
    pub fn ignores_value(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Equals
    }
}

text_enum! {
    /// Options to determine the direction of the ordering.
    SortDirection ("sort direction") {
        /// Arrange items from smallest to largest value.
        Ascending => "asc",

        /// Arrange items from largest to smallest value.
        Descending => "desc",
    }
}

/// A single filter predicate on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterItem {
    /// Identifier of this filter inside the view, used to update or remove it.
    #[serde(default)]
    pub id: String,

    /// Key of the field this filter is applied on.
    #[serde(default)]
    pub field: String,

    /// Comparison to apply.
    #[serde(default)]
    pub operator: Operator,

    /// Value to compare with, ignored by the emptiness operators.
    #[serde(default)]
    pub value: String,
}

impl FilterItem {
    /// Returns a new filter with a random identifier.
    pub fn new(field: &str, operator: Operator, value: &str) -> Self {
        Self {
            id: random_uuid(),
            field: field.to_owned(),
            operator,
            value: value.to_owned(),
        }
    }
}

/// Ordering directive on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortItem {
    /// Key of the field the rows are sorted by.
    pub field: String,

    /// Direction of the ordering.
    pub direction: SortDirection,
}

/// Persisted configuration of a view: visible columns, filters and sort order.
///
/// This is stored as JSON in the `settings` column of the `views` table and has to stay
/// compatible with already saved views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Ordered keys of the visible fields.
    #[serde(default)]
    pub visible_fields: Vec<String>,

    /// Filters, combined with a logical AND.
    #[serde(default)]
    pub filters: Vec<FilterItem>,

    /// Sort directives, only the first one is applied.
    #[serde(default)]
    pub sorts: Vec<SortItem>,
}

impl ViewSettings {
    /// Settings showing all given fields, without any filters or sorts.
    pub fn all_visible(fields: &[FieldDefinition]) -> Self {
        Self {
            visible_fields: fields.iter().map(|field| field.key.clone()).collect(),
            filters: Vec::new(),
            sorts: Vec::new(),
        }
    }

    /// Returns true if the field with this key is visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible_fields.iter().any(|visible| visible == key)
    }

    /// Encodes the settings as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes settings from JSON.
    pub fn from_json(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}

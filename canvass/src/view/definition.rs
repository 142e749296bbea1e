// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::FieldDefinition;
use crate::identifier::{ViewId, WorkspaceId};
use crate::record::RecordType;
use crate::view::ViewSettings;

/// Name of the view shown when no view was saved yet.
pub const DEFAULT_VIEW_NAME: &str = "Default View";

/// Named, saved configuration of how records of one type are displayed in a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Identifier of the stored view, `None` for the default view which was never saved.
    pub id: Option<ViewId>,

    pub workspace_id: WorkspaceId,

    pub record_type: RecordType,

    pub name: String,

    pub settings: ViewSettings,

    /// Incremented with every saved change of the settings.
    pub version: i64,
}

impl View {
    /// Unsaved view showing all fields, offered when no view exists yet.
    pub fn default_for(
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        fields: &[FieldDefinition],
    ) -> Self {
        Self {
            id: None,
            workspace_id: workspace_id.clone(),
            record_type,
            name: DEFAULT_VIEW_NAME.to_owned(),
            settings: ViewSettings::all_visible(fields),
            version: 0,
        }
    }

    /// Returns true if this view exists in storage.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::field::builtin_field_definitions;
    use crate::record::RecordType;

    use super::{View, DEFAULT_VIEW_NAME};

    #[test]
    fn default_view() {
        let fields = builtin_field_definitions(RecordType::Donations);
        let view = View::default_for(&"ws".into(), RecordType::Donations, &fields);

        assert!(!view.is_persisted());
        assert_eq!(view.name, DEFAULT_VIEW_NAME);
        assert_eq!(
            view.settings.visible_fields,
            vec!["amount", "status", "contact_id", "business_id"]
        );
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::db::errors::{
    FieldStorageError, RecordStorageError, ViewStorageError, WorkspaceStorageError,
};
use crate::db::traits::{FieldStore, RecordStore, ViewStore, WorkspaceStore};
use crate::db::utils::now_millis;
use crate::field::{all_builtin_field_definitions, FieldDefinition};
use crate::identifier::{RecordId, UserId, ViewId, WorkspaceId};
use crate::record::{NewRecord, Record, RecordPayload, RecordType};
use crate::view::{View, ViewSettings};
use crate::workspace::{NewWorkspace, Workspace, WorkspaceRole};

#[derive(Debug, Default)]
struct MemoryState {
    workspaces: Vec<Workspace>,
    members: Vec<(WorkspaceId, UserId, WorkspaceRole)>,
    selections: HashMap<UserId, WorkspaceId>,
    records: Vec<Record>,
    fields: Vec<FieldDefinition>,
    views: Vec<View>,
}

impl MemoryState {
    fn is_member(&self, user: &UserId, workspace_id: &WorkspaceId) -> bool {
        self.members
            .iter()
            .any(|(workspace, member, _)| workspace == workspace_id && member == user)
    }

    fn workspace(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|workspace| &workspace.id == id)
    }
}

/// Storage living in memory, implementing the same traits as the SQL store.
///
/// All writes of one call happen under one lock, after every check passed, so they are atomic
/// for all other callers. Built-in field definitions are present from the start.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Returns an empty store holding only the built-in field definitions.
    pub fn new() -> Self {
        let state = MemoryState {
            fields: all_builtin_field_definitions(),
            ..MemoryState::default()
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks the constraints the SQL schema enforces on records.
fn validate_record(record: &NewRecord) -> Result<(), RecordStorageError> {
    let violation = |constraint: &str| {
        Err(RecordStorageError::Custom(format!(
            "Constraint violated: {}",
            constraint
        )))
    };

    match &record.payload {
        RecordPayload::Contact(contact) => {
            if contact.first_name.is_empty() || contact.last_name.is_empty() {
                return violation("contact names can not be empty");
            }
        }
        RecordPayload::Business(business) => {
            if business.name.is_empty() {
                return violation("business name can not be empty");
            }
        }
        RecordPayload::Donation(donation) => {
            if donation.amount.is_nan() || donation.amount < 0.0 {
                return violation("donation amount needs to be zero or positive");
            }
        }
    }

    let methods = &record.contact_methods;

    if methods.emails.iter().any(|email| email.email.is_empty()) {
        return violation("email can not be empty");
    }

    if methods.phones.iter().any(|phone| phone.phone.is_empty()) {
        return violation("phone can not be empty");
    }

    if methods
        .addresses
        .iter()
        .any(|address| address.street1.is_empty())
    {
        return violation("street can not be empty");
    }

    if methods
        .social_media
        .iter()
        .any(|handle| handle.username.is_empty())
    {
        return violation("username can not be empty");
    }

    Ok(())
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_records(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<Record>, RecordStorageError> {
        let state = self.state.lock().await;

        let mut records: Vec<Record> = state
            .records
            .iter()
            .filter(|record| {
                &record.workspace_id == workspace_id && record.record_type() == record_type
            })
            .cloned()
            .collect();

        // Records created within the same millisecond keep their insertion order
        records.sort_by_key(|record| record.created_at);

        Ok(records)
    }

    async fn create_record(&self, record: &NewRecord) -> Result<Record, RecordStorageError> {
        let mut state = self.state.lock().await;

        if state.workspace(&record.workspace_id).is_none() {
            return Err(RecordStorageError::UnknownWorkspace(
                record.workspace_id.clone(),
            ));
        }

        for (record_type, linked_id) in record.payload.linked_records() {
            let exists = state.records.iter().any(|existing| {
                &existing.id == linked_id
                    && existing.workspace_id == record.workspace_id
                    && existing.record_type() == record_type
            });

            if !exists {
                warn!("Rejected {} record with missing link", record.record_type());

                return Err(RecordStorageError::LinkedRecordNotFound {
                    record_type,
                    id: linked_id.clone(),
                });
            }
        }

        if let Err(err) = validate_record(record) {
            warn!("Rejected {} record: {}", record.record_type(), err);
            return Err(err);
        }

        let created = record.clone().into_record(RecordId::random(), now_millis());
        state.records.push(created.clone());

        info!(
            "Created {} record {} in workspace {}",
            created.record_type(),
            created.id,
            created.workspace_id
        );

        Ok(created)
    }
}

#[async_trait]
impl FieldStore for MemoryStore {
    async fn get_field_definitions(
        &self,
        record_type: RecordType,
    ) -> Result<Vec<FieldDefinition>, FieldStorageError> {
        let state = self.state.lock().await;

        let mut fields: Vec<FieldDefinition> = state
            .fields
            .iter()
            .filter(|field| field.record_type == record_type)
            .cloned()
            .collect();

        fields.sort_by(|a, b| (a.position, &a.key).cmp(&(b.position, &b.key)));

        Ok(fields)
    }

    async fn insert_field_definitions(
        &self,
        fields: &[FieldDefinition],
    ) -> Result<u64, FieldStorageError> {
        let mut state = self.state.lock().await;
        let mut inserted = 0;

        for field in fields {
            let exists = state.fields.iter().any(|existing| {
                existing.id == field.id
                    || (existing.record_type == field.record_type && existing.key == field.key)
            });

            if !exists {
                state.fields.push(field.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

#[async_trait]
impl ViewStore for MemoryStore {
    async fn get_views(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<View>, ViewStorageError> {
        let state = self.state.lock().await;

        Ok(state
            .views
            .iter()
            .filter(|view| &view.workspace_id == workspace_id && view.record_type == record_type)
            .cloned()
            .collect())
    }

    async fn get_view(&self, id: &ViewId) -> Result<Option<View>, ViewStorageError> {
        let state = self.state.lock().await;

        Ok(state
            .views
            .iter()
            .find(|view| view.id.as_ref() == Some(id))
            .cloned())
    }

    async fn create_view(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        name: &str,
        settings: &ViewSettings,
    ) -> Result<View, ViewStorageError> {
        if name.is_empty() {
            return Err(ViewStorageError::Custom(
                "Constraint violated: view name can not be empty".into(),
            ));
        }

        let view = View {
            id: Some(ViewId::random()),
            workspace_id: workspace_id.clone(),
            record_type,
            name: name.to_owned(),
            settings: settings.clone(),
            version: 1,
        };

        self.state.lock().await.views.push(view.clone());

        debug!("Created view '{}' for {} records", name, record_type);

        Ok(view)
    }

    async fn update_view_settings(
        &self,
        id: &ViewId,
        settings: &ViewSettings,
        expected_version: Option<i64>,
    ) -> Result<View, ViewStorageError> {
        let mut state = self.state.lock().await;

        let view = state
            .views
            .iter_mut()
            .find(|view| view.id.as_ref() == Some(id))
            .ok_or_else(|| ViewStorageError::NotFound(id.clone()))?;

        if let Some(expected) = expected_version {
            if expected != view.version {
                warn!(
                    "Rejected update of view {}, expected version {} but found {}",
                    id, expected, view.version
                );

                return Err(ViewStorageError::VersionConflict {
                    id: id.clone(),
                    expected,
                    actual: view.version,
                });
            }
        }

        view.settings = settings.clone();
        view.version += 1;

        Ok(view.clone())
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn create_workspace(
        &self,
        workspace: &NewWorkspace,
        owner: &UserId,
    ) -> Result<Workspace, WorkspaceStorageError> {
        if workspace.name.is_empty() {
            return Err(WorkspaceStorageError::Custom(
                "Constraint violated: workspace name can not be empty".into(),
            ));
        }

        let workspace = workspace
            .clone()
            .into_workspace(WorkspaceId::random(), now_millis());

        let mut state = self.state.lock().await;
        state.workspaces.push(workspace.clone());
        state
            .members
            .push((workspace.id.clone(), owner.clone(), WorkspaceRole::Owner));
        state
            .selections
            .insert(owner.clone(), workspace.id.clone());

        info!("Created workspace {} for user {}", workspace.id, owner);

        Ok(workspace)
    }

    async fn get_workspace(
        &self,
        id: &WorkspaceId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError> {
        Ok(self.state.lock().await.workspace(id).cloned())
    }

    async fn get_workspaces_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<(Workspace, WorkspaceRole)>, WorkspaceStorageError> {
        let state = self.state.lock().await;

        let mut workspaces: Vec<(Workspace, WorkspaceRole)> = state
            .members
            .iter()
            .filter(|(_, member, _)| member == user)
            .filter_map(|(workspace_id, _, role)| {
                state
                    .workspace(workspace_id)
                    .map(|workspace| (workspace.clone(), *role))
            })
            .collect();

        workspaces.sort_by(|(a, _), (b, _)| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        Ok(workspaces)
    }

    async fn select_workspace(
        &self,
        user: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<(), WorkspaceStorageError> {
        let mut state = self.state.lock().await;

        if !state.is_member(user, workspace_id) {
            return Err(WorkspaceStorageError::NotAMember {
                user: user.clone(),
                workspace: workspace_id.clone(),
            });
        }

        state.selections.insert(user.clone(), workspace_id.clone());

        Ok(())
    }

    async fn get_selected_workspace(
        &self,
        user: &UserId,
    ) -> Result<Option<Workspace>, WorkspaceStorageError> {
        let state = self.state.lock().await;

        Ok(state
            .selections
            .get(user)
            .and_then(|workspace_id| state.workspace(workspace_id))
            .cloned())
    }
}

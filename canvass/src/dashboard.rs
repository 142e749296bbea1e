// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use log::debug;

use crate::config::Configuration;
use crate::db::traits::Repository;
use crate::db::{
    connection_pool, create_database, run_pending_migrations, seed_field_definitions, SqlStore,
};
use crate::errors::DashboardError;
use crate::field::FieldDefinition;
use crate::form::{build_record, RecordForm};
use crate::identifier::{RecordId, UserId, ViewId, WorkspaceId};
use crate::record::{Record, RecordType};
use crate::view::{Table, View, ViewSession, ViewSettings};
use crate::workspace::{NewWorkspace, Workspace, WorkspaceRole};

/// Service tying storage, forms and views together.
///
/// Every read goes to storage, the dashboard keeps no state besides the store itself. Unsaved
/// view edits live in a [`ViewSession`] owned by the caller.
#[derive(Debug, Clone)]
pub struct Dashboard<S: Repository = SqlStore> {
    store: S,
}

impl Dashboard<SqlStore> {
    /// Makes sure the database is created, migrated and seeded before returning a dashboard on
    /// top of it.
    pub async fn start(config: &Configuration) -> Result<Self> {
        // Create database when not existing
        create_database(&config.database_url).await?;

        // Create connection pool
        let pool = connection_pool(&config.database_url, config.database_max_connections).await?;

        // Run pending migrations
        run_pending_migrations(&pool).await?;

        let store = SqlStore::new(pool);
        seed_field_definitions(&store).await?;

        Ok(Self::new(store))
    }
}

impl<S: Repository> Dashboard<S> {
    /// Returns a dashboard using the given storage.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Storage backend of this dashboard.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All records of one type in a workspace, oldest first.
    pub async fn records(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<Record>, DashboardError> {
        Ok(self.store.get_records(workspace_id, record_type).await?)
    }

    /// Field definitions of a record type.
    pub async fn fields(
        &self,
        record_type: RecordType,
    ) -> Result<Vec<FieldDefinition>, DashboardError> {
        let fields = self.store.get_field_definitions(record_type).await?;

        if fields.is_empty() {
            return Err(DashboardError::MissingFieldDefinitions(record_type));
        }

        Ok(fields)
    }

    /// Saved views of one record type in a workspace.
    pub async fn views(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<View>, DashboardError> {
        Ok(self.store.get_views(workspace_id, record_type).await?)
    }

    /// Opens a view session for one record type in a workspace.
    ///
    /// Uses the requested view if given, otherwise the first saved view. Without any saved view
    /// the session starts on an unsaved default view showing all fields.
    pub async fn open_session(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        view_id: Option<&ViewId>,
    ) -> Result<ViewSession, DashboardError> {
        let fields = self.fields(record_type).await?;

        let view = match view_id {
            Some(view_id) => {
                let view = self
                    .store
                    .get_view(view_id)
                    .await?
                    .filter(|view| {
                        &view.workspace_id == workspace_id && view.record_type == record_type
                    })
                    .ok_or_else(|| DashboardError::ViewMismatch(view_id.clone()))?;

                Some(view)
            }
            None => self
                .store
                .get_views(workspace_id, record_type)
                .await?
                .into_iter()
                .next(),
        };

        let view = view.unwrap_or_else(|| View::default_for(workspace_id, record_type, &fields));
        debug!("Opened view '{}' for {} records", view.name, record_type);

        Ok(ViewSession::new(view, fields))
    }

    /// Creates a named view showing all fields, without filters and sorts.
    pub async fn create_view(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        name: &str,
    ) -> Result<View, DashboardError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(DashboardError::EmptyViewName);
        }

        let fields = self.fields(record_type).await?;
        let settings = ViewSettings::all_visible(&fields);

        Ok(self
            .store
            .create_view(workspace_id, record_type, name, &settings)
            .await?)
    }

    /// Replaces the settings of a saved view, the last write wins.
    pub async fn save_view_settings(
        &self,
        view_id: &ViewId,
        settings: &ViewSettings,
    ) -> Result<View, DashboardError> {
        Ok(self
            .store
            .update_view_settings(view_id, settings, None)
            .await?)
    }

    /// Persists the edits of a session, the last write wins.
    ///
    /// An unsaved default view is created in storage on its first save.
    pub async fn save_session(&self, session: &mut ViewSession) -> Result<(), DashboardError> {
        self.persist_session(session, false).await
    }

    /// Persists the edits of a session unless the view was changed since it was loaded.
    ///
    /// Fails with a version conflict in that case, the session keeps its edits.
    pub async fn save_session_checked(
        &self,
        session: &mut ViewSession,
    ) -> Result<(), DashboardError> {
        self.persist_session(session, true).await
    }

    async fn persist_session(
        &self,
        session: &mut ViewSession,
        checked: bool,
    ) -> Result<(), DashboardError> {
        let view = session.view();

        let saved = match &view.id {
            Some(view_id) => {
                let expected_version = checked.then_some(view.version);
                self.store
                    .update_view_settings(view_id, &view.settings, expected_version)
                    .await?
            }
            None => {
                self.store
                    .create_view(&view.workspace_id, view.record_type, &view.name, &view.settings)
                    .await?
            }
        };

        debug!("Saved view '{}' at version {}", saved.name, saved.version);
        *session.view_mut() = saved;

        Ok(())
    }

    /// Loads the records of a session and renders them through its view.
    pub async fn table(&self, session: &ViewSession) -> Result<Table, DashboardError> {
        let view = session.view();
        let records = self.records(&view.workspace_id, view.record_type).await?;

        Ok(session.render(&records))
    }

    /// Validates a submitted form and creates the record it describes.
    pub async fn create_record(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        form: &RecordForm,
    ) -> Result<Record, DashboardError> {
        let fields = self.fields(record_type).await?;
        let new_record = build_record(workspace_id, record_type, &fields, form)?;
        Ok(self.store.create_record(&new_record).await?)
    }

    /// Records which can be picked as target of a linked record field, with their labels.
    pub async fn linked_record_options(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<(RecordId, String)>, DashboardError> {
        let options = self
            .records(workspace_id, record_type)
            .await?
            .into_iter()
            .map(|record| {
                let label = record.payload.label();
                (record.id, label)
            })
            .collect();

        Ok(options)
    }

    /// Creates a workspace owned and selected by the given user.
    pub async fn create_workspace(
        &self,
        workspace: &NewWorkspace,
        owner: &UserId,
    ) -> Result<Workspace, DashboardError> {
        Ok(self.store.create_workspace(workspace, owner).await?)
    }

    /// Workspace with the given id.
    pub async fn workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Option<Workspace>, DashboardError> {
        Ok(self.store.get_workspace(workspace_id).await?)
    }

    /// Workspaces the user is a member of, with their role.
    pub async fn workspaces(
        &self,
        user: &UserId,
    ) -> Result<Vec<(Workspace, WorkspaceRole)>, DashboardError> {
        Ok(self.store.get_workspaces_for_user(user).await?)
    }

    /// Selects a workspace for the user.
    pub async fn select_workspace(
        &self,
        user: &UserId,
        workspace_id: &WorkspaceId,
    ) -> Result<(), DashboardError> {
        Ok(self.store.select_workspace(user, workspace_id).await?)
    }

    /// Workspace the user selected last.
    pub async fn selected_workspace(
        &self,
        user: &UserId,
    ) -> Result<Option<Workspace>, DashboardError> {
        Ok(self.store.get_selected_workspace(user).await?)
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workspaces are the tenants of the dashboard, every record and view belongs to exactly one.
use crate::identifier::WorkspaceId;

text_enum! {
    /// Kind of organisation a workspace belongs to.
    WorkspaceType ("workspace type") {
        /// A state party organisation.
        StateParty => "state_party",

        /// A county party organisation.
        CountyParty => "county_party",

        /// A single campaign.
        Campaign => "campaign",
    }
}

text_enum! {
    /// Role of a user inside a workspace.
    WorkspaceRole ("workspace role") {
        /// Created the workspace.
        Owner => "owner",

        /// Manages the workspace.
        Admin => "admin",

        /// Regular member.
        Member => "member",
    }
}

/// A tenant owning records and views.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub workspace_type: WorkspaceType,
    pub state: String,
    pub county: Option<String>,
    pub race: Option<String>,
    /// Creation time in milliseconds since the unix epoch.
    pub created_at: i64,
}

impl Workspace {
    /// Short description shown next to the workspace name.
    ///
    /// Campaigns show their race, county parties their county and state parties their state.
    pub fn subtitle(&self) -> String {
        match self.workspace_type {
            WorkspaceType::Campaign => self.race.clone().unwrap_or_default(),
            WorkspaceType::CountyParty => {
                format!("{} County", self.county.as_deref().unwrap_or_default())
            }
            WorkspaceType::StateParty => self.state.clone(),
        }
    }
}

/// A workspace which was not persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkspace {
    pub name: String,
    pub workspace_type: WorkspaceType,
    pub state: String,
    pub county: Option<String>,
    pub race: Option<String>,
}

impl NewWorkspace {
    /// Turns this into a persisted workspace with the given identifier and creation time.
    pub fn into_workspace(self, id: WorkspaceId, created_at: i64) -> Workspace {
        Workspace {
            id,
            name: self.name,
            workspace_type: self.workspace_type,
            state: self.state,
            county: self.county,
            race: self.race,
            created_at,
        }
    }
}

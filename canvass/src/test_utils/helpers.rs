// SPDX-License-Identifier: AGPL-3.0-or-later

use rstest::fixture;

use crate::db::traits::WorkspaceStore;
use crate::identifier::{RecordId, UserId, WorkspaceId};
use crate::record::{
    Business, Contact, ContactMethods, Donation, DonationStatus, Email, EmailStatus, NewRecord,
    Phone, PhoneStatus,
};
use crate::workspace::{NewWorkspace, Workspace, WorkspaceType};

/// User owning the workspaces created in tests.
#[fixture]
pub fn owner() -> UserId {
    UserId::from("00000000-0000-4000-8000-0000000000aa")
}

/// A campaign workspace which was not persisted yet.
#[fixture]
pub fn new_workspace() -> NewWorkspace {
    NewWorkspace {
        name: "Friends of Ada".into(),
        workspace_type: WorkspaceType::Campaign,
        state: "IL".into(),
        county: None,
        race: Some("State Senate".into()),
    }
}

/// Persists the default test workspace, owned by the default test user.
pub async fn add_workspace<S: WorkspaceStore + Sync>(store: &S) -> Workspace {
    store
        .create_workspace(&new_workspace(), &owner())
        .await
        .expect("Insert workspace")
}

/// Email address with active status.
pub fn email(value: &str, is_primary: bool) -> Email {
    Email {
        email: value.into(),
        email_type: None,
        status: EmailStatus::Active,
        is_primary,
    }
}

/// Phone number with active status.
pub fn phone(value: &str, is_primary: bool) -> Phone {
    Phone {
        phone: value.into(),
        phone_type: None,
        status: PhoneStatus::Active,
        is_primary,
    }
}

/// New contact record with the given email addresses.
pub fn contact(
    workspace_id: &WorkspaceId,
    first_name: &str,
    last_name: &str,
    emails: Vec<Email>,
) -> NewRecord {
    NewRecord {
        workspace_id: workspace_id.clone(),
        payload: Contact::new(first_name, last_name).into(),
        contact_methods: ContactMethods {
            emails,
            ..ContactMethods::default()
        },
    }
}

/// New business record without contact methods.
pub fn business(workspace_id: &WorkspaceId, name: &str) -> NewRecord {
    NewRecord::new(workspace_id, Business { name: name.into() }.into())
}

/// New promised donation, optionally linked to a contact.
pub fn donation(workspace_id: &WorkspaceId, amount: f64, contact_id: Option<RecordId>) -> NewRecord {
    NewRecord::new(
        workspace_id,
        Donation {
            amount,
            status: DonationStatus::Promise,
            contact_id,
            business_id: None,
        }
        .into(),
    )
}

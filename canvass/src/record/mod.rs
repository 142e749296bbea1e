// SPDX-License-Identifier: AGPL-3.0-or-later

//! Polymorphic records.
//!
//! A record is a header row (identifier, workspace, record type) which fans out into exactly one
//! typed payload row and any number of contact method rows. Records are only ever read in their
//! assembled form, a header without its payload is not a valid record.
mod contact_method;
mod payload;
mod record_type;

pub use contact_method::{
    Address, AddressStatus, AddressType, ContactMethods, Email, EmailStatus, EmailType, Phone,
    PhoneStatus, PhoneType, SocialMedia, SocialPlatform,
};
pub use payload::{Business, Contact, Donation, DonationStatus, RecordPayload};
pub use record_type::RecordType;

use crate::identifier::{RecordId, WorkspaceId};

/// A fully assembled record as it is read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Identifier of the header row.
    pub id: RecordId,

    /// Workspace owning the record and all its rows.
    pub workspace_id: WorkspaceId,

    /// Creation time in milliseconds since the unix epoch.
    pub created_at: i64,

    /// Typed payload.
    pub payload: RecordPayload,

    /// Emails, phone numbers, addresses and social media handles.
    pub contact_methods: ContactMethods,
}

impl Record {
    /// Record type of this record, derived from its payload.
    pub fn record_type(&self) -> RecordType {
        self.payload.record_type()
    }
}

/// A record which was not persisted yet.
///
/// Storage backends turn this into a header, the typed payload and contact method rows in one
/// atomic step.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Workspace the record is created in.
    pub workspace_id: WorkspaceId,

    /// Typed payload.
    pub payload: RecordPayload,

    /// Emails, phone numbers, addresses and social media handles.
    pub contact_methods: ContactMethods,
}

impl NewRecord {
    /// Returns a new record without any contact methods.
    pub fn new(workspace_id: &WorkspaceId, payload: RecordPayload) -> Self {
        Self {
            workspace_id: workspace_id.clone(),
            payload,
            contact_methods: ContactMethods::default(),
        }
    }

    /// Record type of the record to be created.
    pub fn record_type(&self) -> RecordType {
        self.payload.record_type()
    }

    /// Turns this into a persisted record with the given identifier and creation time.
    pub fn into_record(self, id: RecordId, created_at: i64) -> Record {
        Record {
            id,
            workspace_id: self.workspace_id,
            created_at,
            payload: self.payload,
            contact_methods: self.contact_methods,
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later

//! Field definitions describe the attributes of every record type.
//!
//! They drive both sides of the dashboard: which inputs a record form offers and which columns
//! a view can show. Definitions are schema metadata, they are seeded into storage once and never
//! edited by the application.
mod builtin;

use std::fmt;

pub use builtin::{all_builtin_field_definitions, builtin_field_definitions};

use crate::identifier::FieldId;
use crate::record::RecordType;

text_enum! {
    /// Value type of a field.
    FieldKind ("field type") {
        /// Free text.
        Text => "text",

        /// Numeric value, for example a donation amount.
        Number => "number",

        /// One of the donation status options.
        DonationStatus => "donation_status",

        /// Multi-valued email addresses.
        Email => "email",

        /// Multi-valued phone numbers.
        Phone => "phone",

        /// Multi-valued postal addresses.
        Address => "address",

        /// Multi-valued social media handles.
        SocialMedia => "social_media",

        /// Reference to another record.
        LinkedRecord => "linked_record",
    }
}

impl FieldKind {
    /// Returns true for kinds which are stored in a junction table.
    pub fn is_contact_method(&self) -> bool {
        matches!(
            self,
            FieldKind::Email | FieldKind::Phone | FieldKind::Address | FieldKind::SocialMedia
        )
    }
}

/// Stable identifier of a field, parsed into the collections which need special treatment.
///
/// Contact method collections are projected differently from plain columns, every other key
/// addresses a column of the typed payload or the record header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Email addresses (`emails`).
    Emails,

    /// Phone numbers (`phone_numbers`).
    PhoneNumbers,

    /// Postal addresses (`addresses`).
    Addresses,

    /// Social media handles (`social_media`).
    SocialMedia,

    /// Any single-valued column.
    Column(String),
}

impl FieldKey {
    /// Returns the string key.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKey::Emails => "emails",
            FieldKey::PhoneNumbers => "phone_numbers",
            FieldKey::Addresses => "addresses",
            FieldKey::SocialMedia => "social_media",
            FieldKey::Column(name) => name,
        }
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        match key {
            "emails" => FieldKey::Emails,
            "phone_numbers" => FieldKey::PhoneNumbers,
            "addresses" => FieldKey::Addresses,
            "social_media" => FieldKey::SocialMedia,
            column => FieldKey::Column(column.to_owned()),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Describes one attribute of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Identifier of the definition.
    pub id: FieldId,

    /// Record type this field belongs to.
    pub record_type: RecordType,

    /// Stable key, used in view settings and forms.
    pub key: String,

    /// Display name, used as column header and form label.
    pub name: String,

    /// Value type.
    pub kind: FieldKind,

    /// Flag indicating if the field holds many values.
    pub is_multiple: bool,

    /// Flag indicating if a form needs to provide a value for this field.
    pub is_required: bool,

    /// Record type referenced by `linked_record` fields.
    pub linked_record_type: Option<RecordType>,

    /// Position of the field in forms and in the default column order.
    pub position: i64,
}

impl FieldDefinition {
    /// Returns the parsed key of this field.
    pub fn field_key(&self) -> FieldKey {
        FieldKey::from(self.key.as_str())
    }
}

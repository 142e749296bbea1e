// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns submitted record forms into records ready for storage.
//!
//! A form is a loose map from field key to the raw input of that field. Building a record checks
//! the input against the field definitions of the record type first, so validation errors are
//! raised before anything is written.
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::ParseEnumError;
use crate::field::{FieldDefinition, FieldKind};
use crate::identifier::{RecordId, WorkspaceId};
use crate::record::{
    Address, AddressStatus, AddressType, Business, Contact, ContactMethods, Donation,
    DonationStatus, Email, EmailStatus, EmailType, NewRecord, Phone, PhoneStatus, PhoneType,
    RecordPayload, RecordType, SocialMedia, SocialPlatform,
};

/// Status option of a form entry which marks it as the primary one.
const PRIMARY_STATUS: &str = "primary";

/// Status option of a form entry which marks it explicitly as not primary.
const SECONDARY_STATUS: &str = "secondary";

/// Validation errors of a submitted record form.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// A required field was left empty.
    #[error("Field '{0}' is required")]
    MissingRequiredField(String),

    /// Form contains a key with no field definition for this record type.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Numeric field holds something which is not a finite number.
    #[error("Field '{field}' expects a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    /// An option string (type, status, platform) is not one of the known values.
    #[error(transparent)]
    InvalidOption(#[from] ParseEnumError),

    /// Shape of the input does not fit the field, for example entries on a text field.
    #[error("Field '{field}' of type {kind} can not take this value")]
    UnexpectedValue { field: String, kind: FieldKind },
}

/// One row of a multi-valued email, phone or social media input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormEntry {
    /// Address, number or username.
    pub value: String,

    /// Email type, phone type or social media platform.
    pub kind: Option<String>,

    /// `primary`, `secondary` or one of the stored status options.
    pub status: Option<String>,
}

impl FormEntry {
    /// Returns an entry with the given value and optional kind and status.
    pub fn new(value: &str, kind: Option<&str>, status: Option<&str>) -> Self {
        Self {
            value: value.to_owned(),
            kind: kind.map(str::to_owned),
            status: status.map(str::to_owned),
        }
    }
}

/// One row of a postal address input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressEntry {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub address_type: Option<String>,
    pub is_primary: bool,
}

/// Raw input of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Input of text, number, donation status and linked record fields.
    Text(String),

    /// Input of email, phone and social media fields.
    Entries(Vec<FormEntry>),

    /// Input of address fields.
    Addresses(Vec<AddressEntry>),
}

impl FormValue {
    /// Returns true when the value would not store anything.
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Text(text) => text.trim().is_empty(),
            FormValue::Entries(entries) => entries.iter().all(|entry| entry.value.trim().is_empty()),
            FormValue::Addresses(addresses) => addresses
                .iter()
                .all(|address| address.street1.trim().is_empty()),
        }
    }

    fn fits(&self, kind: FieldKind) -> bool {
        match self {
            FormValue::Text(_) => !kind.is_contact_method(),
            FormValue::Entries(_) => matches!(
                kind,
                FieldKind::Email | FieldKind::Phone | FieldKind::SocialMedia
            ),
            FormValue::Addresses(_) => kind == FieldKind::Address,
        }
    }
}

/// Input of a record creation form, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    values: BTreeMap<String, FormValue>,
}

impl RecordForm {
    /// Returns an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text input of a field, replacing any earlier input.
    pub fn set_text(&mut self, key: &str, value: &str) -> &mut Self {
        self.values
            .insert(key.to_owned(), FormValue::Text(value.to_owned()));
        self
    }

    /// Appends an entry to a multi-valued field.
    pub fn push_entry(&mut self, key: &str, entry: FormEntry) -> &mut Self {
        match self.values.get_mut(key) {
            Some(FormValue::Entries(entries)) => entries.push(entry),
            _ => {
                self.values
                    .insert(key.to_owned(), FormValue::Entries(vec![entry]));
            }
        }
        self
    }

    /// Appends a postal address to an address field.
    pub fn push_address(&mut self, key: &str, address: AddressEntry) -> &mut Self {
        match self.values.get_mut(key) {
            Some(FormValue::Addresses(addresses)) => addresses.push(address),
            _ => {
                self.values
                    .insert(key.to_owned(), FormValue::Addresses(vec![address]));
            }
        }
        self
    }

    /// Raw input of a field.
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.values.get(key)
    }

    /// Returns true when no field has any input.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(FormValue::is_empty)
    }

    /// Trimmed text input of a field, `None` when missing or blank.
    fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FormValue::Text(text)) => Some(text.trim()).filter(|text| !text.is_empty()),
            _ => None,
        }
    }

    fn entries(&self, key: &str) -> impl Iterator<Item = &FormEntry> {
        let entries = match self.values.get(key) {
            Some(FormValue::Entries(entries)) => entries.as_slice(),
            _ => &[],
        };

        entries.iter().filter(|entry| !entry.value.trim().is_empty())
    }

    fn addresses(&self, key: &str) -> impl Iterator<Item = &AddressEntry> {
        let addresses = match self.values.get(key) {
            Some(FormValue::Addresses(addresses)) => addresses.as_slice(),
            _ => &[],
        };

        addresses
            .iter()
            .filter(|address| !address.street1.trim().is_empty())
    }
}

/// Validates a form against the field definitions of a record type and builds the record.
///
/// Field definitions of other record types are ignored. Multi-valued entries with an empty value
/// are dropped.
pub fn build_record(
    workspace_id: &WorkspaceId,
    record_type: RecordType,
    fields: &[FieldDefinition],
    form: &RecordForm,
) -> Result<NewRecord, FormError> {
    let fields: Vec<&FieldDefinition> = fields
        .iter()
        .filter(|field| field.record_type == record_type)
        .collect();

    for (key, value) in &form.values {
        let field = fields
            .iter()
            .find(|field| &field.key == key)
            .ok_or_else(|| FormError::UnknownField(key.clone()))?;

        if !value.fits(field.kind) {
            return Err(FormError::UnexpectedValue {
                field: key.clone(),
                kind: field.kind,
            });
        }
    }

    if let Some(missing) = fields.iter().find(|field| {
        field.is_required && form.get(&field.key).map_or(true, FormValue::is_empty)
    }) {
        return Err(FormError::MissingRequiredField(missing.key.clone()));
    }

    let payload = match record_type {
        RecordType::Contacts => RecordPayload::Contact(build_contact(form)),
        RecordType::Businesses => RecordPayload::Business(Business {
            name: form.text("name").unwrap_or_default().to_owned(),
        }),
        RecordType::Donations => RecordPayload::Donation(build_donation(form)?),
    };

    let mut contact_methods = ContactMethods::default();

    for field in fields {
        match field.kind {
            FieldKind::Email => {
                for entry in form.entries(&field.key) {
                    contact_methods.emails.push(email_from_entry(entry)?);
                }
            }
            FieldKind::Phone => {
                for entry in form.entries(&field.key) {
                    contact_methods.phones.push(phone_from_entry(entry)?);
                }
            }
            FieldKind::SocialMedia => {
                for entry in form.entries(&field.key) {
                    contact_methods
                        .social_media
                        .push(social_media_from_entry(entry)?);
                }
            }
            FieldKind::Address => {
                for address in form.addresses(&field.key) {
                    contact_methods.addresses.push(address_from_entry(address)?);
                }
            }
            _ => (),
        }
    }

    Ok(NewRecord {
        workspace_id: workspace_id.clone(),
        payload,
        contact_methods,
    })
}

fn build_contact(form: &RecordForm) -> Contact {
    let optional = |key: &str| form.text(key).map(str::to_owned);

    Contact {
        first_name: form.text("first_name").unwrap_or_default().to_owned(),
        middle_name: optional("middle_name"),
        last_name: form.text("last_name").unwrap_or_default().to_owned(),
        gender: optional("gender"),
        pronouns: optional("pronouns"),
        race: optional("race"),
    }
}

fn build_donation(form: &RecordForm) -> Result<Donation, FormError> {
    let amount = form
        .text("amount")
        .ok_or_else(|| FormError::MissingRequiredField("amount".into()))?;

    let amount = amount
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field: "amount".into(),
            value: amount.to_owned(),
        })?;

    let status = match form.text("status") {
        Some(status) => status.parse()?,
        None => DonationStatus::default(),
    };

    Ok(Donation {
        amount,
        status,
        contact_id: form.text("contact_id").map(RecordId::from),
        business_id: form.text("business_id").map(RecordId::from),
    })
}

/// Parses an optional option string, blank counts as not set.
fn parse_option<T>(value: Option<&str>) -> Result<Option<T>, FormError>
where
    T: FromStr<Err = ParseEnumError>,
{
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(value.parse()?)),
        None => Ok(None),
    }
}

/// Splits the status input of an entry into the stored status and the primary flag.
///
/// `primary` and `secondary` only decide the flag, the stored status is the active one then.
fn entry_status<T>(status: Option<&str>, active: T) -> Result<(T, bool), FormError>
where
    T: FromStr<Err = ParseEnumError>,
{
    match status.map(str::trim) {
        Some(PRIMARY_STATUS) => Ok((active, true)),
        Some(SECONDARY_STATUS) => Ok((active, false)),
        other => Ok((parse_option(other)?.unwrap_or(active), false)),
    }
}

fn email_from_entry(entry: &FormEntry) -> Result<Email, FormError> {
    let (status, is_primary) = entry_status(entry.status.as_deref(), EmailStatus::Active)?;

    Ok(Email {
        email: entry.value.trim().to_owned(),
        email_type: parse_option::<EmailType>(entry.kind.as_deref())?,
        status,
        is_primary,
    })
}

fn phone_from_entry(entry: &FormEntry) -> Result<Phone, FormError> {
    let (status, is_primary) = entry_status(entry.status.as_deref(), PhoneStatus::Active)?;

    Ok(Phone {
        phone: entry.value.trim().to_owned(),
        phone_type: parse_option::<PhoneType>(entry.kind.as_deref())?,
        status,
        is_primary,
    })
}

fn social_media_from_entry(entry: &FormEntry) -> Result<SocialMedia, FormError> {
    Ok(SocialMedia {
        platform: parse_option(entry.kind.as_deref())?.unwrap_or(SocialPlatform::Other),
        username: entry.value.trim().to_owned(),
        url: None,
    })
}

fn address_from_entry(address: &AddressEntry) -> Result<Address, FormError> {
    Ok(Address {
        street1: address.street1.trim().to_owned(),
        street2: Some(address.street2.as_deref().unwrap_or_default().trim())
            .filter(|street2| !street2.is_empty())
            .map(str::to_owned),
        city: address.city.trim().to_owned(),
        state: address.state.trim().to_owned(),
        postal_code: address.postal_code.trim().to_owned(),
        address_type: parse_option::<AddressType>(address.address_type.as_deref())?,
        status: AddressStatus::Current,
        is_primary: address.is_primary,
    })
}

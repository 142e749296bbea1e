// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns a field of an assembled record into one displayable cell value.
use std::cmp::Ordering;
use std::fmt;

use crate::field::FieldKey;
use crate::record::{Record, RecordPayload};

/// Display value of one field of one record.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Field has no value.
    Empty,

    /// Textual value.
    Text(String),

    /// Numeric value, compared numerically when sorting.
    Number(f64),
}

impl CellValue {
    /// Returns true if the display string of this value is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Compares two cell values.
    ///
    /// Two numbers are compared numerically, all other combinations compare their display
    /// strings.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }

    fn text(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }

    fn optional(value: Option<&str>) -> Self {
        value.map(CellValue::text).unwrap_or_default()
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Projects one field of a record into a cell value.
///
/// Email addresses and phone numbers show all primary entries joined with a comma, addresses
/// show the first primary address and social media lists every handle. All other keys are looked
/// up in the typed payload and then in the record header.
pub fn project(record: &Record, key: &FieldKey) -> CellValue {
    let methods = &record.contact_methods;

    match key {
        FieldKey::Emails => joined(methods.primary_emails().map(|email| email.email.clone())),
        FieldKey::PhoneNumbers => {
            joined(methods.primary_phones().map(|phone| phone.phone.clone()))
        }
        FieldKey::Addresses => methods
            .primary_address()
            .map(|address| CellValue::Text(address.to_string()))
            .unwrap_or_default(),
        FieldKey::SocialMedia => joined(methods.social_media.iter().map(ToString::to_string)),
        FieldKey::Column(name) => payload_column(&record.payload, name)
            .or_else(|| header_column(record, name))
            .unwrap_or_default(),
    }
}

fn joined<I: Iterator<Item = String>>(values: I) -> CellValue {
    let values: Vec<String> = values.collect();

    if values.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(values.join(", "))
    }
}

fn payload_column(payload: &RecordPayload, name: &str) -> Option<CellValue> {
    let value = match payload {
        RecordPayload::Contact(contact) => match name {
            "first_name" => CellValue::text(&contact.first_name),
            "middle_name" => CellValue::optional(contact.middle_name.as_deref()),
            "last_name" => CellValue::text(&contact.last_name),
            "gender" => CellValue::optional(contact.gender.as_deref()),
            "pronouns" => CellValue::optional(contact.pronouns.as_deref()),
            "race" => CellValue::optional(contact.race.as_deref()),
            _ => return None,
        },
        RecordPayload::Business(business) => match name {
            "name" => CellValue::text(&business.name),
            _ => return None,
        },
        RecordPayload::Donation(donation) => match name {
            "amount" => CellValue::Number(donation.amount),
            "status" => CellValue::text(donation.status.as_str()),
            "contact_id" => CellValue::optional(donation.contact_id.as_ref().map(|id| id.as_str())),
            "business_id" => {
                CellValue::optional(donation.business_id.as_ref().map(|id| id.as_str()))
            }
            _ => return None,
        },
    };

    Some(value)
}

fn header_column(record: &Record, name: &str) -> Option<CellValue> {
    let value = match name {
        "id" => CellValue::text(record.id.as_str()),
        "workspace_id" => CellValue::text(record.workspace_id.as_str()),
        _ => return None,
    };

    Some(value)
}

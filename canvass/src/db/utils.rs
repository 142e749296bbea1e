// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversions from database rows into assembled domain types.
use std::collections::HashMap;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::errors::{
    FieldStorageError, RecordStorageError, ViewStorageError, WorkspaceStorageError,
};
use crate::db::models::{
    AddressRow, BusinessRow, ContactRow, DonationRow, EmailRow, FieldDefinitionRow, PhoneRow,
    SocialMediaRow, ViewRow, WorkspaceRow,
};
use crate::errors::ParseEnumError;
use crate::field::FieldDefinition;
use crate::record::{
    Address, Business, Contact, ContactMethods, Donation, Email, Phone, Record, RecordPayload,
    RecordType, SocialMedia,
};
use crate::view::{View, ViewSettings};
use crate::workspace::Workspace;

/// Current time in milliseconds since the unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or_default()
}

/// Parses a stored enumeration value of the record with the given id.
fn parse_column<T>(record_id: &str, value: &str) -> Result<T, RecordStorageError>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|err: ParseEnumError| RecordStorageError::InvalidRow {
            id: record_id.to_owned(),
            reason: err.to_string(),
        })
}

fn parse_optional_column<T>(
    record_id: &str,
    value: Option<&str>,
) -> Result<Option<T>, RecordStorageError>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .map(|value| parse_column(record_id, value))
        .transpose()
}

fn record(
    id: String,
    workspace_id: String,
    created_at: i64,
    payload: impl Into<RecordPayload>,
) -> Record {
    Record {
        id: id.into(),
        workspace_id: workspace_id.into(),
        created_at,
        payload: payload.into(),
        contact_methods: ContactMethods::default(),
    }
}

/// Builds a contact record without contact methods from its joined row.
pub fn contact_from_row(row: ContactRow) -> Record {
    let contact = Contact {
        first_name: row.first_name,
        middle_name: row.middle_name,
        last_name: row.last_name,
        gender: row.gender,
        pronouns: row.pronouns,
        race: row.race,
    };

    record(row.id, row.workspace_id, row.created_at, contact)
}

/// Builds a business record without contact methods from its joined row.
pub fn business_from_row(row: BusinessRow) -> Record {
    let business = Business { name: row.name };
    record(row.id, row.workspace_id, row.created_at, business)
}

/// Builds a donation record without contact methods from its joined row.
pub fn donation_from_row(row: DonationRow) -> Result<Record, RecordStorageError> {
    let donation = Donation {
        amount: row.amount,
        status: parse_column(&row.id, &row.status)?,
        contact_id: row.contact_id.map(Into::into),
        business_id: row.business_id.map(Into::into),
    };

    Ok(record(row.id, row.workspace_id, row.created_at, donation))
}

/// Groups contact method rows by their record id, keeping the order of the given rows.
pub fn group_contact_methods(
    emails: Vec<EmailRow>,
    phones: Vec<PhoneRow>,
    addresses: Vec<AddressRow>,
    social_media: Vec<SocialMediaRow>,
) -> Result<HashMap<String, ContactMethods>, RecordStorageError> {
    let mut grouped: HashMap<String, ContactMethods> = HashMap::new();

    for row in emails {
        let email = Email {
            email_type: parse_optional_column(&row.record_id, row.email_type.as_deref())?,
            status: parse_column(&row.record_id, &row.status)?,
            email: row.email,
            is_primary: row.is_primary,
        };

        grouped.entry(row.record_id).or_default().emails.push(email);
    }

    for row in phones {
        let phone = Phone {
            phone_type: parse_optional_column(&row.record_id, row.phone_type.as_deref())?,
            status: parse_column(&row.record_id, &row.status)?,
            phone: row.phone,
            is_primary: row.is_primary,
        };

        grouped.entry(row.record_id).or_default().phones.push(phone);
    }

    for row in addresses {
        let address = Address {
            address_type: parse_optional_column(&row.record_id, row.address_type.as_deref())?,
            status: parse_column(&row.record_id, &row.status)?,
            street1: row.street1,
            street2: row.street2,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            is_primary: row.is_primary,
        };

        grouped
            .entry(row.record_id)
            .or_default()
            .addresses
            .push(address);
    }

    for row in social_media {
        let handle = SocialMedia {
            platform: parse_column(&row.record_id, &row.platform)?,
            username: row.username,
            url: row.url,
        };

        grouped
            .entry(row.record_id)
            .or_default()
            .social_media
            .push(handle);
    }

    Ok(grouped)
}

/// Parses a `field_definitions` row.
pub fn field_definition_from_row(
    row: FieldDefinitionRow,
) -> Result<FieldDefinition, FieldStorageError> {
    let record_type = RecordType::from_id(&row.record_type_id).ok_or_else(|| {
        FieldStorageError::Custom(format!("Unknown record type id {}", row.record_type_id))
    })?;

    let kind = row
        .field_type
        .parse()
        .map_err(|err: ParseEnumError| FieldStorageError::Custom(err.to_string()))?;

    let linked_record_type = row
        .linked_record_type
        .as_deref()
        .map(RecordType::from_str)
        .transpose()
        .map_err(|err| FieldStorageError::Custom(err.to_string()))?;

    Ok(FieldDefinition {
        id: row.id.into(),
        record_type,
        key: row.field_key,
        name: row.name,
        kind,
        is_multiple: row.is_multiple,
        is_required: row.is_required,
        linked_record_type,
        position: row.list_index,
    })
}

/// Parses a `views` row, decoding its JSON settings.
pub fn view_from_row(row: ViewRow) -> Result<View, ViewStorageError> {
    let record_type = RecordType::from_id(&row.record_type_id).ok_or_else(|| {
        ViewStorageError::Custom(format!("Unknown record type id {}", row.record_type_id))
    })?;

    let settings = ViewSettings::from_json(&row.settings)
        .map_err(|err| ViewStorageError::InvalidSettings(err.to_string()))?;

    Ok(View {
        id: Some(row.id.into()),
        workspace_id: row.workspace_id.into(),
        record_type,
        name: row.name,
        settings,
        version: row.version,
    })
}

/// Parses a `workspaces` row.
pub fn workspace_from_row(row: WorkspaceRow) -> Result<Workspace, WorkspaceStorageError> {
    let workspace_type = row
        .workspace_type
        .parse()
        .map_err(|err: ParseEnumError| WorkspaceStorageError::Custom(err.to_string()))?;

    Ok(Workspace {
        id: row.id.into(),
        name: row.name,
        workspace_type,
        state: row.state,
        county: row.county,
        race: row.race,
        created_at: row.created_at,
    })
}

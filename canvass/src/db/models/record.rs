// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::FromRow;

/// Header row of a contact joined with its `contact_records` row.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    /// Identifier of the record.
    pub id: String,

    /// Workspace owning the record.
    pub workspace_id: String,

    /// Creation time in milliseconds since the unix epoch.
    pub created_at: i64,

    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<String>,
    pub pronouns: Option<String>,
    pub race: Option<String>,
}

/// Header row of a business joined with its `business_records` row.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct BusinessRow {
    pub id: String,
    pub workspace_id: String,
    pub created_at: i64,
    pub name: String,
}

/// Header row of a donation joined with its `donation_records` row.
#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct DonationRow {
    pub id: String,
    pub workspace_id: String,
    pub created_at: i64,
    pub amount: f64,

    /// Donation status, one of `promise`, `donated` or `cleared`.
    pub status: String,

    pub contact_id: Option<String>,
    pub business_id: Option<String>,
}

/// Representation of a row from the `record_emails` table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct EmailRow {
    /// Record this email address belongs to.
    pub record_id: String,
    pub email: String,
    pub email_type: Option<String>,
    pub status: String,
    pub is_primary: bool,
}

/// Representation of a row from the `record_phones` table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct PhoneRow {
    pub record_id: String,
    pub phone: String,
    pub phone_type: Option<String>,
    pub status: String,
    pub is_primary: bool,
}

/// Representation of a row from the `record_addresses` table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct AddressRow {
    pub record_id: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub address_type: Option<String>,
    pub status: String,
    pub is_primary: bool,
}

/// Representation of a row from the `record_social_media` table.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct SocialMediaRow {
    pub record_id: String,
    pub platform: String,
    pub username: String,
    pub url: Option<String>,
}

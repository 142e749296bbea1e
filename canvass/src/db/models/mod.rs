// SPDX-License-Identifier: AGPL-3.0-or-later

//! Structs representing rows in SQL tables. Needed when coercing results returned from a
//! query using the `sqlx` library.
mod field;
mod record;
mod view;
mod workspace;

pub use field::FieldDefinitionRow;
pub use record::{
    AddressRow, BusinessRow, ContactRow, DonationRow, EmailRow, PhoneRow, SocialMediaRow,
};
pub use view::ViewRow;
pub use workspace::{WorkspaceMemberRow, WorkspaceRow};

// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::identifier::RecordId;
use crate::record::RecordType;

text_enum! {
    /// Progress of a donation.
    DonationStatus ("donation status") {
        /// Donation was promised but not received yet.
        Promise => "promise",

        /// Money was received.
        Donated => "donated",

        /// Payment cleared.
        Cleared => "cleared",
    }
}

impl Default for DonationStatus {
    fn default() -> Self {
        DonationStatus::Promise
    }
}

/// Typed payload of a contact record.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<String>,
    pub pronouns: Option<String>,
    pub race: Option<String>,
}

impl Contact {
    /// Returns a contact with only the required name fields set.
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_owned(),
            middle_name: None,
            last_name: last_name.to_owned(),
            gender: None,
            pronouns: None,
            race: None,
        }
    }

    /// First and last name separated by a whitespace.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Typed payload of a business record.
#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    pub name: String,
}

/// Typed payload of a donation record.
///
/// Donations can point at the contact and / or business they came from. Both need to be records
/// of the same workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub amount: f64,
    pub status: DonationStatus,
    pub contact_id: Option<RecordId>,
    pub business_id: Option<RecordId>,
}

/// The one typed payload every record carries, selected by its record type.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload {
    /// Payload stored in `contact_records`.
    Contact(Contact),

    /// Payload stored in `business_records`.
    Business(Business),

    /// Payload stored in `donation_records`.
    Donation(Donation),
}

impl RecordPayload {
    /// Record type matching this payload.
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordPayload::Contact(_) => RecordType::Contacts,
            RecordPayload::Business(_) => RecordType::Businesses,
            RecordPayload::Donation(_) => RecordType::Donations,
        }
    }

    /// Short human readable label, used when offering records as link targets.
    pub fn label(&self) -> String {
        match self {
            RecordPayload::Contact(contact) => contact.full_name(),
            RecordPayload::Business(business) => business.name.clone(),
            RecordPayload::Donation(donation) => format!("{} ({})", donation.amount, donation.status),
        }
    }

    /// Records this payload links to, together with the record type they need to have.
    pub fn linked_records(&self) -> Vec<(RecordType, &RecordId)> {
        match self {
            RecordPayload::Donation(donation) => {
                let mut links = Vec::new();

                if let Some(contact_id) = &donation.contact_id {
                    links.push((RecordType::Contacts, contact_id));
                }

                if let Some(business_id) = &donation.business_id {
                    links.push((RecordType::Businesses, business_id));
                }

                links
            }
            RecordPayload::Contact(_) | RecordPayload::Business(_) => Vec::new(),
        }
    }
}

impl From<Contact> for RecordPayload {
    fn from(contact: Contact) -> Self {
        RecordPayload::Contact(contact)
    }
}

impl From<Business> for RecordPayload {
    fn from(business: Business) -> Self {
        RecordPayload::Business(business)
    }
}

impl From<Donation> for RecordPayload {
    fn from(donation: Donation) -> Self {
        RecordPayload::Donation(donation)
    }
}

#[cfg(test)]
mod tests {
    use crate::record::RecordType;

    use super::{Business, Contact, Donation, DonationStatus, RecordPayload};

    #[test]
    fn labels() {
        let contact: RecordPayload = Contact::new("Ada", "Lovelace").into();
        let business: RecordPayload = Business {
            name: "Acme".into(),
        }
        .into();
        let donation: RecordPayload = Donation {
            amount: 25.5,
            status: DonationStatus::Donated,
            contact_id: None,
            business_id: None,
        }
        .into();

        assert_eq!(contact.label(), "Ada Lovelace");
        assert_eq!(business.label(), "Acme");
        assert_eq!(donation.label(), "25.5 (donated)");
    }

    #[test]
    fn donation_links() {
        let donation: RecordPayload = Donation {
            amount: 10.0,
            status: DonationStatus::default(),
            contact_id: Some("contact".into()),
            business_id: Some("business".into()),
        }
        .into();

        let links = donation.linked_records();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].0, RecordType::Contacts);
        assert_eq!(links[0].1.as_str(), "contact");
        assert_eq!(links[1].0, RecordType::Businesses);
        assert_eq!(donation.record_type(), RecordType::Donations);
    }
}

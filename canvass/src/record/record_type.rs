// SPDX-License-Identifier: AGPL-3.0-or-later

text_enum! {
    /// Kinds of records a workspace can hold.
    ///
    /// Every record type has its own table for the typed payload, all of them share the `records`
    /// header table.
    RecordType ("record type") {
        /// People, identified by their names.
        Contacts => "contacts",

        /// Donations of a contact or business.
        Donations => "donations",

        /// Companies and organisations.
        Businesses => "businesses",
    }
}

const CONTACTS_ID: &str = "00000000-0000-0000-0000-000000000001";
const DONATIONS_ID: &str = "00000000-0000-0000-0000-000000000002";
const BUSINESSES_ID: &str = "00000000-0000-0000-0000-000000000004";

impl RecordType {
    /// Stable identifier stored in the `record_type_id` column of the header table.
    pub fn id(&self) -> &'static str {
        match self {
            RecordType::Contacts => CONTACTS_ID,
            RecordType::Donations => DONATIONS_ID,
            RecordType::Businesses => BUSINESSES_ID,
        }
    }

    /// Returns the record type stored under this identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        RecordType::ALL.iter().copied().find(|record_type| record_type.id() == id)
    }

    /// Human readable name of a single record of this type.
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordType::Contacts => "Contact",
            RecordType::Donations => "Donation",
            RecordType::Businesses => "Business",
        }
    }

    /// Name of the table holding the typed payload.
    pub fn table_name(&self) -> &'static str {
        match self {
            RecordType::Contacts => "contact_records",
            RecordType::Donations => "donation_records",
            RecordType::Businesses => "business_records",
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::RecordType;

    #[rstest]
    #[case(RecordType::Contacts, "contacts", "00000000-0000-0000-0000-000000000001")]
    #[case(RecordType::Donations, "donations", "00000000-0000-0000-0000-000000000002")]
    #[case(RecordType::Businesses, "businesses", "00000000-0000-0000-0000-000000000004")]
    fn slugs_and_ids(#[case] record_type: RecordType, #[case] slug: &str, #[case] id: &str) {
        assert_eq!(record_type.as_str(), slug);
        assert_eq!(slug.parse::<RecordType>().unwrap(), record_type);
        assert_eq!(record_type.id(), id);
        assert_eq!(RecordType::from_id(id), Some(record_type));
    }

    #[test]
    fn unknown_record_types() {
        assert!("events".parse::<RecordType>().is_err());
        assert_eq!(RecordType::from_id("00000000-0000-0000-0000-000000000003"), None);
    }
}

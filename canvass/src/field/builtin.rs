// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::{FieldDefinition, FieldKind};
use crate::identifier::FieldId;
use crate::record::RecordType;

/// Key, display name, kind, multiple, required and linked record type of a built-in field.
type FieldSpec = (
    &'static str,
    &'static str,
    FieldKind,
    bool,
    bool,
    Option<RecordType>,
);

const CONTACT_FIELDS: &[FieldSpec] = &[
    ("first_name", "First Name", FieldKind::Text, false, true, None),
    ("middle_name", "Middle Name", FieldKind::Text, false, false, None),
    ("last_name", "Last Name", FieldKind::Text, false, true, None),
    ("gender", "Gender", FieldKind::Text, false, false, None),
    ("pronouns", "Pronouns", FieldKind::Text, false, false, None),
    ("race", "Race", FieldKind::Text, false, false, None),
    ("emails", "Email", FieldKind::Email, true, false, None),
    ("phone_numbers", "Phone", FieldKind::Phone, true, false, None),
    ("addresses", "Address", FieldKind::Address, true, false, None),
    ("social_media", "Social Media", FieldKind::SocialMedia, true, false, None),
];

const BUSINESS_FIELDS: &[FieldSpec] = &[
    ("name", "Name", FieldKind::Text, false, true, None),
    ("emails", "Email", FieldKind::Email, true, false, None),
    ("phone_numbers", "Phone", FieldKind::Phone, true, false, None),
    ("addresses", "Address", FieldKind::Address, true, false, None),
    ("social_media", "Social Media", FieldKind::SocialMedia, true, false, None),
];

const DONATION_FIELDS: &[FieldSpec] = &[
    ("amount", "Amount", FieldKind::Number, false, true, None),
    ("status", "Status", FieldKind::DonationStatus, false, false, None),
    (
        "contact_id",
        "Contact",
        FieldKind::LinkedRecord,
        false,
        false,
        Some(RecordType::Contacts),
    ),
    (
        "business_id",
        "Business",
        FieldKind::LinkedRecord,
        false,
        false,
        Some(RecordType::Businesses),
    ),
];

/// Field definitions every installation starts with, for one record type.
///
/// Identifiers are derived from record type and key so seeding them is idempotent.
pub fn builtin_field_definitions(record_type: RecordType) -> Vec<FieldDefinition> {
    let specs = match record_type {
        RecordType::Contacts => CONTACT_FIELDS,
        RecordType::Businesses => BUSINESS_FIELDS,
        RecordType::Donations => DONATION_FIELDS,
    };

    specs
        .iter()
        .enumerate()
        .map(
            |(position, (key, name, kind, is_multiple, is_required, linked_record_type))| {
                FieldDefinition {
                    id: FieldId::from(format!("{}.{}", record_type, key)),
                    record_type,
                    key: key.to_string(),
                    name: name.to_string(),
                    kind: *kind,
                    is_multiple: *is_multiple,
                    is_required: *is_required,
                    linked_record_type: *linked_record_type,
                    position: position as i64,
                }
            },
        )
        .collect()
}

/// Built-in field definitions of all record types.
pub fn all_builtin_field_definitions() -> Vec<FieldDefinition> {
    RecordType::ALL
        .iter()
        .flat_map(|record_type| builtin_field_definitions(*record_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::field::FieldKind;
    use crate::record::RecordType;

    use super::{all_builtin_field_definitions, builtin_field_definitions};

    #[test]
    fn contact_fields() {
        let fields = builtin_field_definitions(RecordType::Contacts);
        let keys: Vec<&str> = fields.iter().map(|field| field.key.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "first_name",
                "middle_name",
                "last_name",
                "gender",
                "pronouns",
                "race",
                "emails",
                "phone_numbers",
                "addresses",
                "social_media"
            ]
        );
        assert_eq!(fields[0].id.as_str(), "contacts.first_name");
        assert!(fields[0].is_required);
        assert_eq!(fields[9].position, 9);
    }

    #[test]
    fn multiple_fields_are_contact_methods() {
        for field in all_builtin_field_definitions() {
            assert_eq!(field.is_multiple, field.kind.is_contact_method(), "{}", field.key);
        }
    }

    #[test]
    fn linked_fields_name_their_target() {
        for field in builtin_field_definitions(RecordType::Donations) {
            assert_eq!(
                field.kind == FieldKind::LinkedRecord,
                field.linked_record_type.is_some()
            );
        }
    }
}

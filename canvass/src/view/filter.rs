// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::FieldKey;
use crate::record::Record;
use crate::view::projection::project;
use crate::view::{FilterItem, Operator};

impl FilterItem {
    /// Returns true if this filter does not restrict anything.
    ///
    /// This is the case for filters without a field and for comparing operators without a
    /// value, for example while a filter is still being edited.
    pub fn is_vacuous(&self) -> bool {
        self.field.is_empty() || (!self.operator.ignores_value() && self.value.is_empty())
    }

    /// Tests a record against this filter.
    ///
    /// Comparison happens case-insensitively on the projected display string of the field.
    pub fn matches(&self, record: &Record) -> bool {
        if self.field.is_empty() {
            return true;
        }

        let display = project(record, &FieldKey::from(self.field.as_str()))
            .to_string()
            .to_lowercase();

        match self.operator {
            Operator::IsEmpty => display.is_empty(),
            Operator::IsNotEmpty => !display.is_empty(),
            _ if self.value.is_empty() => true,
            Operator::Equals => display == self.value.to_lowercase(),
            Operator::Contains => display.contains(&self.value.to_lowercase()),
            Operator::StartsWith => display.starts_with(&self.value.to_lowercase()),
            Operator::EndsWith => display.ends_with(&self.value.to_lowercase()),
        }
    }
}

/// Returns all records matching every filter, in their original order.
pub fn apply_filters<'a>(records: &'a [Record], filters: &[FilterItem]) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::record::{Business, ContactMethods, Email, Record};
    use crate::test_utils::email;
    use crate::view::{FilterItem, Operator};

    use super::apply_filters;

    fn business(name: &str, emails: &[&str]) -> Record {
        let emails = emails.iter().map(|value| email(value, true)).collect();
        business_with_emails(name, emails)
    }

    fn business_with_emails(name: &str, emails: Vec<Email>) -> Record {
        Record {
            id: name.into(),
            workspace_id: "ws".into(),
            created_at: 0,
            payload: Business { name: name.into() }.into(),
            contact_methods: ContactMethods {
                emails,
                ..ContactMethods::default()
            },
        }
    }

    fn filter(field: &str, operator: Operator, value: &str) -> FilterItem {
        FilterItem::new(field, operator, value)
    }

    #[rstest]
    #[case::equals(Operator::Equals, "ACME Corp", true)]
    #[case::equals_partial(Operator::Equals, "acme", false)]
    #[case::contains(Operator::Contains, "ME co", true)]
    #[case::starts_with(Operator::StartsWith, "acme", true)]
    #[case::ends_with(Operator::EndsWith, "CORP", true)]
    #[case::ends_with_mismatch(Operator::EndsWith, "acme", false)]
    #[case::is_empty(Operator::IsEmpty, "ignored", false)]
    #[case::is_not_empty(Operator::IsNotEmpty, "", true)]
    #[case::empty_value(Operator::Equals, "", true)]
    fn match_operators(#[case] operator: Operator, #[case] value: &str, #[case] expected: bool) {
        let record = business("Acme Corp", &[]);
        assert_eq!(filter("name", operator, value).matches(&record), expected);
    }

    #[test]
    fn match_projected_collections() {
        let with_email = business("A", &["info@acme.org", "sales@acme.org"]);
        let without_email = business("B", &[]);

        let contains = filter("emails", Operator::Contains, "SALES@");
        assert!(contains.matches(&with_email));
        assert!(!contains.matches(&without_email));

        let is_empty = filter("emails", Operator::IsEmpty, "");
        assert!(!is_empty.matches(&with_email));
        assert!(is_empty.matches(&without_email));
    }

    #[test]
    fn only_primary_emails_are_matched() {
        let records = vec![
            business_with_emails(
                "Primary",
                vec![email("alice@acme.com", true), email("alice@home.org", false)],
            ),
            business_with_emails("Secondary", vec![email("alice@acme.com", false)]),
        ];

        let result = apply_filters(&records, &[filter("emails", Operator::Contains, "acme")]);
        let ids: Vec<&str> = result.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["Primary"]);

        // Non-primary addresses don't count as a value either
        let result = apply_filters(&records, &[filter("emails", Operator::IsEmpty, "")]);
        let ids: Vec<&str> = result.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["Secondary"]);
    }

    #[test]
    fn unset_field_matches_everything() {
        let record = business("Acme", &[]);
        let filter = filter("", Operator::IsEmpty, "");

        assert!(filter.is_vacuous());
        assert!(filter.matches(&record));
    }

    #[test]
    fn combine_filters_with_and() {
        let records = vec![
            business("Acme Corp", &["info@acme.org"]),
            business("Acme Labs", &[]),
            business("Globex", &["info@globex.org"]),
        ];

        let filters = vec![
            filter("name", Operator::StartsWith, "acme"),
            filter("emails", Operator::IsNotEmpty, ""),
        ];

        let result = apply_filters(&records, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "Acme Corp");
        assert_eq!(apply_filters(&records, &[]).len(), 3);
    }

    fn operator_strategy() -> impl Strategy<Value = Operator> {
        prop::sample::select(Operator::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn filtering_keeps_order_and_never_adds(
            names in prop::collection::vec("[a-cA-C]{0,4}", 0..12),
            operator in operator_strategy(),
            value in "[a-c]{0,2}",
        ) {
            let records: Vec<Record> = names.iter().map(|name| business(name, &[])).collect();
            let filters = vec![filter("name", operator, &value)];
            let result = apply_filters(&records, &filters);

            prop_assert!(result.len() <= records.len());

            let mut remaining = records.iter();
            for kept in result {
                prop_assert!(remaining.any(|record| std::ptr::eq(record, kept)));
            }
        }

        #[test]
        fn vacuous_filters_keep_everything(
            names in prop::collection::vec("[a-z]{0,6}", 0..12),
            operator in operator_strategy(),
        ) {
            let records: Vec<Record> = names.iter().map(|name| business(name, &[])).collect();
            let filter = filter("", operator, "x");

            prop_assert!(filter.is_vacuous());
            prop_assert_eq!(apply_filters(&records, &[filter]).len(), records.len());
        }

        #[test]
        fn emptiness_operators_partition(
            names in prop::collection::vec("[a-z]{0,3}", 0..12),
        ) {
            let records: Vec<Record> = names.iter().map(|name| business(name, &[])).collect();
            let empty = apply_filters(&records, &[filter("name", Operator::IsEmpty, "")]);
            let not_empty = apply_filters(&records, &[filter("name", Operator::IsNotEmpty, "")]);

            prop_assert_eq!(empty.len() + not_empty.len(), records.len());
        }
    }
}

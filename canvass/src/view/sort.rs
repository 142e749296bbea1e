// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::field::FieldKey;
use crate::record::Record;
use crate::view::projection::project;
use crate::view::{SortDirection, SortItem, ViewSettings};

/// Currently active ordering of a view.
///
/// Toggling the same field cycles through ascending, descending and unsorted. Toggling another
/// field starts over with ascending order on that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortState(Option<SortItem>);

impl SortState {
    /// Returns an unsorted state.
    pub fn new() -> Self {
        Self(None)
    }

    /// Restores the state from the first sort directive of saved settings.
    pub fn from_settings(settings: &ViewSettings) -> Self {
        Self(settings.sorts.first().cloned())
    }

    /// Key of the field rows are sorted by.
    pub fn field(&self) -> Option<&str> {
        self.0.as_ref().map(|sort| sort.field.as_str())
    }

    /// Direction of the active ordering.
    pub fn direction(&self) -> Option<SortDirection> {
        self.0.as_ref().map(|sort| sort.direction)
    }

    /// Advances the ordering for a click on the given field.
    pub fn toggle(&mut self, field: &str) {
        self.0 = match &self.0 {
            Some(sort) if sort.field == field => match sort.direction {
                SortDirection::Ascending => Some(SortItem {
                    field: field.to_owned(),
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortItem {
                field: field.to_owned(),
                direction: SortDirection::Ascending,
            }),
        };
    }

    /// Sort directives to persist in view settings, holding zero or one item.
    pub fn to_sorts(&self) -> Vec<SortItem> {
        self.0.iter().cloned().collect()
    }

    /// Orders the given rows in place.
    ///
    /// The sort is stable, rows with equal values keep their relative order.
    pub fn apply(&self, records: &mut [&Record]) {
        let sort = match &self.0 {
            Some(sort) => sort,
            None => return,
        };

        let key = FieldKey::from(sort.field.as_str());

        records.sort_by(|a, b| {
            let ordering = project(a, &key).compare(&project(b, &key));

            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::record::{ContactMethods, Donation, DonationStatus, Record};
    use crate::view::{SortDirection, SortItem, ViewSettings};

    use super::SortState;

    fn donation(id: &str, amount: f64) -> Record {
        Record {
            id: id.into(),
            workspace_id: "ws".into(),
            created_at: 0,
            payload: Donation {
                amount,
                status: DonationStatus::Promise,
                contact_id: None,
                business_id: None,
            }
            .into(),
            contact_methods: ContactMethods::default(),
        }
    }

    #[test]
    fn cycle_directions() {
        let mut state = SortState::new();
        assert_eq!(state.field(), None);

        state.toggle("amount");
        assert_eq!(state.field(), Some("amount"));
        assert_eq!(state.direction(), Some(SortDirection::Ascending));

        state.toggle("amount");
        assert_eq!(state.direction(), Some(SortDirection::Descending));

        state.toggle("amount");
        assert_eq!(state, SortState::new());
        assert!(state.to_sorts().is_empty());
    }

    #[test]
    fn switch_field_restarts_ascending() {
        let mut state = SortState::new();
        state.toggle("amount");
        state.toggle("amount");
        state.toggle("status");

        assert_eq!(
            state.to_sorts(),
            vec![SortItem {
                field: "status".into(),
                direction: SortDirection::Ascending
            }]
        );
    }

    #[test]
    fn restore_first_directive() {
        let settings = ViewSettings {
            sorts: vec![
                SortItem {
                    field: "amount".into(),
                    direction: SortDirection::Descending,
                },
                SortItem {
                    field: "status".into(),
                    direction: SortDirection::Ascending,
                },
            ],
            ..ViewSettings::default()
        };

        let state = SortState::from_settings(&settings);
        assert_eq!(state.field(), Some("amount"));
        assert_eq!(state.to_sorts().len(), 1);
    }

    #[test]
    fn sort_numbers_numerically() {
        let records = vec![donation("a", 10.0), donation("b", 9.0), donation("c", 100.0)];
        let mut rows: Vec<&Record> = records.iter().collect();

        let mut state = SortState::new();
        state.toggle("amount");
        state.apply(&mut rows);

        let ids: Vec<&str> = rows.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        state.toggle("amount");
        state.apply(&mut rows);

        let ids: Vec<&str> = rows.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn third_toggle_restores_original_order() {
        let records = vec![
            donation("a", 50.0),
            donation("b", 5.0),
            donation("c", 500.0),
            donation("d", 5.0),
        ];

        let render = |state: &SortState| {
            let mut rows: Vec<&Record> = records.iter().collect();
            state.apply(&mut rows);
            rows.iter()
                .map(|record| record.id.as_str().to_owned())
                .collect::<Vec<String>>()
        };

        let mut state = SortState::new();

        state.toggle("amount");
        assert_eq!(render(&state), vec!["b", "d", "a", "c"]);

        state.toggle("amount");
        assert_eq!(render(&state), vec!["c", "a", "b", "d"]);

        state.toggle("amount");
        assert_eq!(render(&state), vec!["a", "b", "c", "d"]);
    }

    proptest! {
        #[test]
        fn stable_and_ordered(amounts in prop::collection::vec(0u8..5, 0..16)) {
            let records: Vec<Record> = amounts
                .iter()
                .enumerate()
                .map(|(index, amount)| donation(&index.to_string(), *amount as f64))
                .collect();
            let mut rows: Vec<&Record> = records.iter().collect();

            let mut state = SortState::new();
            state.toggle("amount");
            state.apply(&mut rows);

            prop_assert_eq!(rows.len(), records.len());

            for pair in rows.windows(2) {
                let (a, b) = (amount(pair[0]), amount(pair[1]));
                prop_assert!(a <= b);

                if a == b {
                    let (a, b): (usize, usize) = (
                        pair[0].id.as_str().parse().unwrap(),
                        pair[1].id.as_str().parse().unwrap(),
                    );
                    prop_assert!(a < b);
                }
            }
        }
    }

    fn amount(record: &Record) -> f64 {
        match &record.payload {
            crate::record::RecordPayload::Donation(donation) => donation.amount,
            _ => panic!("expected donation"),
        }
    }
}

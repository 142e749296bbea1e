// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use futures::try_join;
use log::{debug, info, warn};
use sqlx::{query, query_as, query_scalar, Any, Transaction};

use crate::db::errors::RecordStorageError;
use crate::db::models::{
    AddressRow, BusinessRow, ContactRow, DonationRow, EmailRow, PhoneRow, SocialMediaRow,
};
use crate::db::traits::RecordStore;
use crate::db::utils::{
    business_from_row, contact_from_row, donation_from_row, group_contact_methods, now_millis,
};
use crate::db::SqlStore;
use crate::identifier::{random_uuid, RecordId, WorkspaceId};
use crate::record::{ContactMethods, NewRecord, Record, RecordPayload, RecordType};

impl SqlStore {
    /// Fetches the header and typed payload of all records of one type in a workspace.
    ///
    /// Headers without a typed payload row are dropped by the inner join.
    async fn get_record_payloads(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<Record>, RecordStorageError> {
        let records = match record_type {
            RecordType::Contacts => query_as::<_, ContactRow>(
                "
                SELECT
                    records.id,
                    records.workspace_id,
                    records.created_at,
                    contact_records.first_name,
                    contact_records.middle_name,
                    contact_records.last_name,
                    contact_records.gender,
                    contact_records.pronouns,
                    contact_records.race
                FROM
                    records
                INNER JOIN contact_records
                    ON contact_records.record_id = records.id
                WHERE
                    records.workspace_id = $1
                    AND records.record_type_id = $2
                ORDER BY
                    records.created_at, records.id
                ",
            )
            .bind(workspace_id.as_str())
            .bind(record_type.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RecordStorageError::Custom(e.to_string()))?
            .into_iter()
            .map(contact_from_row)
            .collect(),
            RecordType::Businesses => query_as::<_, BusinessRow>(
                "
                SELECT
                    records.id,
                    records.workspace_id,
                    records.created_at,
                    business_records.name
                FROM
                    records
                INNER JOIN business_records
                    ON business_records.record_id = records.id
                WHERE
                    records.workspace_id = $1
                    AND records.record_type_id = $2
                ORDER BY
                    records.created_at, records.id
                ",
            )
            .bind(workspace_id.as_str())
            .bind(record_type.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RecordStorageError::Custom(e.to_string()))?
            .into_iter()
            .map(business_from_row)
            .collect(),
            RecordType::Donations => query_as::<_, DonationRow>(
                "
                SELECT
                    records.id,
                    records.workspace_id,
                    records.created_at,
                    donation_records.amount,
                    donation_records.status,
                    donation_records.contact_id,
                    donation_records.business_id
                FROM
                    records
                INNER JOIN donation_records
                    ON donation_records.record_id = records.id
                WHERE
                    records.workspace_id = $1
                    AND records.record_type_id = $2
                ORDER BY
                    records.created_at, records.id
                ",
            )
            .bind(workspace_id.as_str())
            .bind(record_type.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RecordStorageError::Custom(e.to_string()))?
            .into_iter()
            .map(donation_from_row)
            .collect::<Result<Vec<Record>, RecordStorageError>>()?,
        };

        Ok(records)
    }

    /// Fetches all contact method rows of records of one type in a workspace, in insertion
    /// order.
    async fn get_contact_method_rows(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<
        (
            Vec<EmailRow>,
            Vec<PhoneRow>,
            Vec<AddressRow>,
            Vec<SocialMediaRow>,
        ),
        RecordStorageError,
    > {
        let emails = query_as::<_, EmailRow>(
            "
            SELECT
                record_emails.record_id,
                record_emails.email,
                record_emails.email_type,
                record_emails.status,
                record_emails.is_primary
            FROM
                record_emails
            INNER JOIN records
                ON records.id = record_emails.record_id
            WHERE
                records.workspace_id = $1
                AND records.record_type_id = $2
            ORDER BY
                record_emails.record_id, record_emails.list_index
            ",
        )
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .fetch_all(&self.pool);

        let phones = query_as::<_, PhoneRow>(
            "
            SELECT
                record_phones.record_id,
                record_phones.phone,
                record_phones.phone_type,
                record_phones.status,
                record_phones.is_primary
            FROM
                record_phones
            INNER JOIN records
                ON records.id = record_phones.record_id
            WHERE
                records.workspace_id = $1
                AND records.record_type_id = $2
            ORDER BY
                record_phones.record_id, record_phones.list_index
            ",
        )
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .fetch_all(&self.pool);

        let addresses = query_as::<_, AddressRow>(
            "
            SELECT
                record_addresses.record_id,
                record_addresses.street1,
                record_addresses.street2,
                record_addresses.city,
                record_addresses.state,
                record_addresses.postal_code,
                record_addresses.address_type,
                record_addresses.status,
                record_addresses.is_primary
            FROM
                record_addresses
            INNER JOIN records
                ON records.id = record_addresses.record_id
            WHERE
                records.workspace_id = $1
                AND records.record_type_id = $2
            ORDER BY
                record_addresses.record_id, record_addresses.list_index
            ",
        )
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .fetch_all(&self.pool);

        let social_media = query_as::<_, SocialMediaRow>(
            "
            SELECT
                record_social_media.record_id,
                record_social_media.platform,
                record_social_media.username,
                record_social_media.url
            FROM
                record_social_media
            INNER JOIN records
                ON records.id = record_social_media.record_id
            WHERE
                records.workspace_id = $1
                AND records.record_type_id = $2
            ORDER BY
                record_social_media.record_id, record_social_media.list_index
            ",
        )
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .fetch_all(&self.pool);

        try_join!(emails, phones, addresses, social_media)
            .map_err(|e| RecordStorageError::Custom(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for SqlStore {
    async fn get_records(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<Record>, RecordStorageError> {
        let mut records = self.get_record_payloads(workspace_id, record_type).await?;

        let (emails, phones, addresses, social_media) = self
            .get_contact_method_rows(workspace_id, record_type)
            .await?;
        let mut contact_methods = group_contact_methods(emails, phones, addresses, social_media)?;

        for record in records.iter_mut() {
            if let Some(methods) = contact_methods.remove(record.id.as_str()) {
                record.contact_methods = methods;
            }
        }

        debug!(
            "Loaded {} {} records of workspace {}",
            records.len(),
            record_type,
            workspace_id
        );

        Ok(records)
    }

    /// Inserts the header, the typed payload and all contact methods in one transaction.
    ///
    /// Any failing statement rolls back the whole transaction, no partial record is ever left
    /// behind.
    async fn create_record(&self, record: &NewRecord) -> Result<Record, RecordStorageError> {
        let id = RecordId::random();
        let created_at = now_millis();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

        match insert_record(&mut tx, &id, created_at, record).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

                info!(
                    "Created {} record {} in workspace {}",
                    record.record_type(),
                    id,
                    record.workspace_id
                );

                Ok(record.clone().into_record(id, created_at))
            }
            Err(err) => {
                warn!("Rolled back creation of {} record: {}", record.record_type(), err);

                tx.rollback()
                    .await
                    .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

                Err(err)
            }
        }
    }
}

async fn insert_record(
    tx: &mut Transaction<'_, Any>,
    id: &RecordId,
    created_at: i64,
    record: &NewRecord,
) -> Result<(), RecordStorageError> {
    let workspace = query_scalar::<_, String>("SELECT id FROM workspaces WHERE id = $1")
        .bind(record.workspace_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

    if workspace.is_none() {
        return Err(RecordStorageError::UnknownWorkspace(
            record.workspace_id.clone(),
        ));
    }

    // Linked records need to live in the same workspace and have the expected type
    for (record_type, linked_id) in record.payload.linked_records() {
        let linked = query_scalar::<_, String>(
            "
            SELECT
                id
            FROM
                records
            WHERE
                id = $1
                AND workspace_id = $2
                AND record_type_id = $3
            ",
        )
        .bind(linked_id.as_str())
        .bind(record.workspace_id.as_str())
        .bind(record_type.id())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

        if linked.is_none() {
            return Err(RecordStorageError::LinkedRecordNotFound {
                record_type,
                id: linked_id.clone(),
            });
        }
    }

    query(
        "
        INSERT INTO
            records (
                id,
                workspace_id,
                record_type_id,
                created_at
            )
        VALUES
            ($1, $2, $3, $4)
        ",
    )
    .bind(id.as_str())
    .bind(record.workspace_id.as_str())
    .bind(record.record_type().id())
    .bind(created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

    insert_payload(tx, id, &record.payload).await?;
    insert_contact_methods(tx, id, &record.contact_methods).await?;

    Ok(())
}

async fn insert_payload(
    tx: &mut Transaction<'_, Any>,
    id: &RecordId,
    payload: &RecordPayload,
) -> Result<(), RecordStorageError> {
    let statement = match payload {
        RecordPayload::Contact(contact) => query(
            "
            INSERT INTO
                contact_records (
                    record_id,
                    first_name,
                    middle_name,
                    last_name,
                    gender,
                    pronouns,
                    race
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id.as_str())
        .bind(contact.first_name.as_str())
        .bind(contact.middle_name.as_deref())
        .bind(contact.last_name.as_str())
        .bind(contact.gender.as_deref())
        .bind(contact.pronouns.as_deref())
        .bind(contact.race.as_deref()),
        RecordPayload::Business(business) => query(
            "
            INSERT INTO
                business_records (
                    record_id,
                    name
                )
            VALUES
                ($1, $2)
            ",
        )
        .bind(id.as_str())
        .bind(business.name.as_str()),
        RecordPayload::Donation(donation) => query(
            "
            INSERT INTO
                donation_records (
                    record_id,
                    amount,
                    status,
                    contact_id,
                    business_id
                )
            VALUES
                ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id.as_str())
        .bind(donation.amount)
        .bind(donation.status.as_str())
        .bind(donation.contact_id.as_ref().map(|id| id.as_str()))
        .bind(donation.business_id.as_ref().map(|id| id.as_str())),
    };

    statement
        .execute(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;

    Ok(())
}

async fn insert_contact_methods(
    tx: &mut Transaction<'_, Any>,
    id: &RecordId,
    methods: &ContactMethods,
) -> Result<(), RecordStorageError> {
    for (index, email) in methods.emails.iter().enumerate() {
        query(
            "
            INSERT INTO
                record_emails (
                    id,
                    record_id,
                    list_index,
                    email,
                    email_type,
                    status,
                    is_primary
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(random_uuid())
        .bind(id.as_str())
        .bind(index as i64)
        .bind(email.email.as_str())
        .bind(email.email_type.map(|email_type| email_type.as_str()))
        .bind(email.status.as_str())
        .bind(email.is_primary)
        .execute(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;
    }

    for (index, phone) in methods.phones.iter().enumerate() {
        query(
            "
            INSERT INTO
                record_phones (
                    id,
                    record_id,
                    list_index,
                    phone,
                    phone_type,
                    status,
                    is_primary
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(random_uuid())
        .bind(id.as_str())
        .bind(index as i64)
        .bind(phone.phone.as_str())
        .bind(phone.phone_type.map(|phone_type| phone_type.as_str()))
        .bind(phone.status.as_str())
        .bind(phone.is_primary)
        .execute(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;
    }

    for (index, address) in methods.addresses.iter().enumerate() {
        query(
            "
            INSERT INTO
                record_addresses (
                    id,
                    record_id,
                    list_index,
                    street1,
                    street2,
                    city,
                    state,
                    postal_code,
                    address_type,
                    status,
                    is_primary
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(random_uuid())
        .bind(id.as_str())
        .bind(index as i64)
        .bind(address.street1.as_str())
        .bind(address.street2.as_deref())
        .bind(address.city.as_str())
        .bind(address.state.as_str())
        .bind(address.postal_code.as_str())
        .bind(address.address_type.map(|address_type| address_type.as_str()))
        .bind(address.status.as_str())
        .bind(address.is_primary)
        .execute(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;
    }

    for (index, handle) in methods.social_media.iter().enumerate() {
        query(
            "
            INSERT INTO
                record_social_media (
                    id,
                    record_id,
                    list_index,
                    platform,
                    username,
                    url
                )
            VALUES
                ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(random_uuid())
        .bind(id.as_str())
        .bind(index as i64)
        .bind(handle.platform.as_str())
        .bind(handle.username.as_str())
        .bind(handle.url.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(|e| RecordStorageError::Custom(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sqlx::{query, query_scalar};

    use crate::db::errors::RecordStorageError;
    use crate::db::traits::RecordStore;
    use crate::db::SqlStore;
    use crate::identifier::{RecordId, WorkspaceId};
    use crate::record::{
        Address, AddressStatus, AddressType, RecordPayload, RecordType, SocialMedia,
        SocialPlatform,
    };
    use crate::test_utils::{
        add_workspace, business, contact, donation, email, phone, test_runner,
    };

    async fn count(store: &SqlStore, table: &str) -> i64 {
        query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[rstest]
    fn create_and_assemble_contact() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;

            let mut new_record = contact(
                &workspace.id,
                "Ada",
                "Lovelace",
                vec![email("ada@home.org", true), email("ada@work.org", false)],
            );
            new_record.contact_methods.phones = vec![phone("555-0100", true)];
            new_record.contact_methods.addresses = vec![Address {
                street1: "1 Main St".into(),
                street2: None,
                city: "Springfield".into(),
                state: "IL".into(),
                postal_code: "62701".into(),
                address_type: Some(AddressType::Home),
                status: AddressStatus::Current,
                is_primary: true,
            }];
            new_record.contact_methods.social_media = vec![SocialMedia {
                platform: SocialPlatform::Twitter,
                username: "ada".into(),
                url: None,
            }];

            let created = store.create_record(&new_record).await.unwrap();
            assert_eq!(created.contact_methods, new_record.contact_methods);

            let records = store
                .get_records(&workspace.id, RecordType::Contacts)
                .await
                .unwrap();

            assert_eq!(records, vec![created]);
        });
    }

    #[rstest]
    fn records_without_contact_methods() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            store
                .create_record(&business(&workspace.id, "Acme"))
                .await
                .unwrap();

            let records = store
                .get_records(&workspace.id, RecordType::Businesses)
                .await
                .unwrap();

            assert_eq!(records.len(), 1);
            assert!(records[0].contact_methods.is_empty());
            assert_eq!(
                records[0].payload,
                RecordPayload::Business(crate::record::Business {
                    name: "Acme".into()
                })
            );
        });
    }

    #[rstest]
    fn scope_by_workspace_and_type() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            let other = add_workspace(&store).await;

            for name in ["A", "B", "C"] {
                store
                    .create_record(&contact(&workspace.id, name, "Doe", vec![]))
                    .await
                    .unwrap();
            }
            store
                .create_record(&contact(&other.id, "D", "Doe", vec![]))
                .await
                .unwrap();
            store
                .create_record(&business(&workspace.id, "Acme"))
                .await
                .unwrap();

            let records = store
                .get_records(&workspace.id, RecordType::Contacts)
                .await
                .unwrap();
            assert_eq!(records.len(), 3);

            let keys: Vec<(i64, String)> = records
                .iter()
                .map(|record| (record.created_at, record.id.to_string()))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);

            assert!(records
                .iter()
                .all(|record| record.workspace_id == workspace.id));
        });
    }

    #[rstest]
    fn skip_headers_without_payload() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;

            query(
                "
                INSERT INTO
                    records (id, workspace_id, record_type_id, created_at)
                VALUES
                    ($1, $2, $3, $4)
                ",
            )
            .bind(RecordId::random().as_str())
            .bind(workspace.id.as_str())
            .bind(RecordType::Contacts.id())
            .bind(0_i64)
            .execute(&store.pool)
            .await
            .unwrap();

            let records = store
                .get_records(&workspace.id, RecordType::Contacts)
                .await
                .unwrap();
            assert!(records.is_empty());
        });
    }

    #[rstest]
    fn roll_back_failed_payload() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;

            let result = store
                .create_record(&donation(&workspace.id, -5.0, None))
                .await;
            assert!(matches!(result, Err(RecordStorageError::Custom(_))));

            assert_eq!(count(&store, "records").await, 0);
            assert_eq!(count(&store, "donation_records").await, 0);
        });
    }

    #[rstest]
    fn roll_back_failed_contact_method() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;

            let new_record = contact(
                &workspace.id,
                "Ada",
                "Lovelace",
                vec![email("ada@home.org", true), email("", false)],
            );
            let result = store.create_record(&new_record).await;
            assert!(result.is_err());

            assert_eq!(count(&store, "records").await, 0);
            assert_eq!(count(&store, "contact_records").await, 0);
            assert_eq!(count(&store, "record_emails").await, 0);
        });
    }

    #[rstest]
    fn check_linked_records() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            let other = add_workspace(&store).await;

            let ada = store
                .create_record(&contact(&workspace.id, "Ada", "Lovelace", vec![]))
                .await
                .unwrap();
            let stranger = store
                .create_record(&contact(&other.id, "Eve", "Doe", vec![]))
                .await
                .unwrap();
            let acme = store
                .create_record(&business(&workspace.id, "Acme"))
                .await
                .unwrap();

            // Linked contact lives in another workspace
            let result = store
                .create_record(&donation(&workspace.id, 10.0, Some(stranger.id.clone())))
                .await;
            assert!(matches!(
                result,
                Err(RecordStorageError::LinkedRecordNotFound { record_type: RecordType::Contacts, .. })
            ));

            // Linked record is not a contact
            let result = store
                .create_record(&donation(&workspace.id, 10.0, Some(acme.id.clone())))
                .await;
            assert!(result.is_err());

            let created = store
                .create_record(&donation(&workspace.id, 10.0, Some(ada.id.clone())))
                .await
                .unwrap();

            let donations = store
                .get_records(&workspace.id, RecordType::Donations)
                .await
                .unwrap();
            assert_eq!(donations, vec![created]);
        });
    }

    #[rstest]
    fn unknown_workspace() {
        test_runner(|store: SqlStore| async move {
            let workspace_id = WorkspaceId::random();
            let result = store.create_record(&business(&workspace_id, "Acme")).await;

            assert!(matches!(
                result,
                Err(RecordStorageError::UnknownWorkspace(id)) if id == workspace_id
            ));
            assert_eq!(count(&store, "records").await, 0);
        });
    }
}

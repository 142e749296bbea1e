// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use sqlx::{query, query_as};

use crate::db::errors::FieldStorageError;
use crate::db::models::FieldDefinitionRow;
use crate::db::traits::FieldStore;
use crate::db::utils::field_definition_from_row;
use crate::db::SqlStore;
use crate::field::FieldDefinition;
use crate::record::RecordType;

#[async_trait]
impl FieldStore for SqlStore {
    async fn get_field_definitions(
        &self,
        record_type: RecordType,
    ) -> Result<Vec<FieldDefinition>, FieldStorageError> {
        let rows = query_as::<_, FieldDefinitionRow>(
            "
            SELECT
                id,
                record_type_id,
                field_key,
                name,
                field_type,
                is_multiple,
                is_required,
                linked_record_type,
                list_index
            FROM
                field_definitions
            WHERE
                record_type_id = $1
            ORDER BY
                list_index, field_key
            ",
        )
        .bind(record_type.id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FieldStorageError::Custom(e.to_string()))?;

        rows.into_iter().map(field_definition_from_row).collect()
    }

    async fn insert_field_definitions(
        &self,
        fields: &[FieldDefinition],
    ) -> Result<u64, FieldStorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FieldStorageError::Custom(e.to_string()))?;

        let mut inserted = 0;

        for field in fields {
            inserted += query(
                "
                INSERT INTO
                    field_definitions (
                        id,
                        record_type_id,
                        field_key,
                        name,
                        field_type,
                        is_multiple,
                        is_required,
                        linked_record_type,
                        list_index
                    )
                VALUES
                    ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(field.id.as_str())
            .bind(field.record_type.id())
            .bind(field.key.as_str())
            .bind(field.name.as_str())
            .bind(field.kind.as_str())
            .bind(field.is_multiple)
            .bind(field.is_required)
            .bind(field.linked_record_type.map(|record_type| record_type.as_str()))
            .bind(field.position)
            .execute(&mut tx)
            .await
            .map_err(|e| FieldStorageError::Custom(e.to_string()))?
            .rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| FieldStorageError::Custom(e.to_string()))?;

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::db::seed_field_definitions;
    use crate::db::traits::FieldStore;
    use crate::db::SqlStore;
    use crate::field::builtin_field_definitions;
    use crate::record::RecordType;
    use crate::test_utils::test_runner;

    #[rstest]
    #[case::contacts(RecordType::Contacts)]
    #[case::businesses(RecordType::Businesses)]
    #[case::donations(RecordType::Donations)]
    fn seeded_definitions(#[case] record_type: RecordType) {
        test_runner(move |store: SqlStore| async move {
            let fields = store.get_field_definitions(record_type).await.unwrap();
            assert_eq!(fields, builtin_field_definitions(record_type));
        });
    }

    #[rstest]
    fn seeding_is_idempotent() {
        test_runner(|store: SqlStore| async move {
            // The test database was seeded already
            assert_eq!(seed_field_definitions(&store).await.unwrap(), 0);

            let fields = store
                .get_field_definitions(RecordType::Contacts)
                .await
                .unwrap();
            assert_eq!(fields.len(), 10);
        });
    }
}

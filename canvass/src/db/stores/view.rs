// SPDX-License-Identifier: AGPL-3.0-or-later

use async_trait::async_trait;
use log::{debug, warn};
use sqlx::{query, query_as, query_scalar};

use crate::db::errors::ViewStorageError;
use crate::db::models::ViewRow;
use crate::db::traits::ViewStore;
use crate::db::utils::{now_millis, view_from_row};
use crate::db::SqlStore;
use crate::identifier::{ViewId, WorkspaceId};
use crate::record::RecordType;
use crate::view::{View, ViewSettings};

const SELECT_VIEW: &str = "
    SELECT
        id,
        workspace_id,
        record_type_id,
        name,
        settings,
        version
    FROM
        views
";

#[async_trait]
impl ViewStore for SqlStore {
    async fn get_views(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
    ) -> Result<Vec<View>, ViewStorageError> {
        let rows = query_as::<_, ViewRow>(&format!(
            "
            {}
            WHERE
                workspace_id = $1
                AND record_type_id = $2
            ORDER BY
                created_at, id
            ",
            SELECT_VIEW
        ))
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ViewStorageError::Custom(e.to_string()))?;

        rows.into_iter().map(view_from_row).collect()
    }

    async fn get_view(&self, id: &ViewId) -> Result<Option<View>, ViewStorageError> {
        let row = query_as::<_, ViewRow>(&format!("{} WHERE id = $1", SELECT_VIEW))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ViewStorageError::Custom(e.to_string()))?;

        row.map(view_from_row).transpose()
    }

    async fn create_view(
        &self,
        workspace_id: &WorkspaceId,
        record_type: RecordType,
        name: &str,
        settings: &ViewSettings,
    ) -> Result<View, ViewStorageError> {
        let view = View {
            id: Some(ViewId::random()),
            workspace_id: workspace_id.clone(),
            record_type,
            name: name.to_owned(),
            settings: settings.clone(),
            version: 1,
        };

        let encoded = settings
            .to_json()
            .map_err(|e| ViewStorageError::InvalidSettings(e.to_string()))?;

        query(
            "
            INSERT INTO
                views (
                    id,
                    workspace_id,
                    record_type_id,
                    name,
                    settings,
                    version,
                    created_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(view.id.as_ref().map(|id| id.as_str()))
        .bind(workspace_id.as_str())
        .bind(record_type.id())
        .bind(name)
        .bind(encoded)
        .bind(view.version)
        .bind(now_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| ViewStorageError::Custom(e.to_string()))?;

        debug!("Created view '{}' for {} records", name, record_type);

        Ok(view)
    }

    /// Overwrites the whole settings of a view with a single statement.
    ///
    /// Unchecked updates always apply on top of the latest version. Checked updates only apply
    /// when the stored version still is the expected one.
    async fn update_view_settings(
        &self,
        id: &ViewId,
        settings: &ViewSettings,
        expected_version: Option<i64>,
    ) -> Result<View, ViewStorageError> {
        let encoded = settings
            .to_json()
            .map_err(|e| ViewStorageError::InvalidSettings(e.to_string()))?;

        let result = match expected_version {
            None => {
                query(
                    "
                    UPDATE
                        views
                    SET
                        settings = $1,
                        version = version + 1
                    WHERE
                        id = $2
                    ",
                )
                .bind(encoded)
                .bind(id.as_str())
                .execute(&self.pool)
                .await
            }
            Some(expected) => {
                query(
                    "
                    UPDATE
                        views
                    SET
                        settings = $1,
                        version = version + 1
                    WHERE
                        id = $2
                        AND version = $3
                    ",
                )
                .bind(encoded)
                .bind(id.as_str())
                .bind(expected)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(|e| ViewStorageError::Custom(e.to_string()))?;

        if result.rows_affected() == 0 {
            let actual = query_scalar::<_, i64>("SELECT version FROM views WHERE id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ViewStorageError::Custom(e.to_string()))?;

            return match (actual, expected_version) {
                (Some(actual), Some(expected)) => {
                    warn!(
                        "Rejected update of view {}, expected version {} but found {}",
                        id, expected, actual
                    );

                    Err(ViewStorageError::VersionConflict {
                        id: id.clone(),
                        expected,
                        actual,
                    })
                }
                _ => Err(ViewStorageError::NotFound(id.clone())),
            };
        }

        // Concurrent unchecked writers might already have bumped the version again
        let row = query_as::<_, ViewRow>(&format!("{} WHERE id = $1", SELECT_VIEW))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ViewStorageError::Custom(e.to_string()))?
            .ok_or_else(|| ViewStorageError::NotFound(id.clone()))?;

        debug!("Updated settings of view {} to version {}", id, row.version);

        view_from_row(row)
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use rstest::rstest;
    use sqlx::query;

    use crate::db::errors::ViewStorageError;
    use crate::db::traits::ViewStore;
    use crate::db::SqlStore;
    use crate::identifier::ViewId;
    use crate::record::RecordType;
    use crate::test_utils::{
        add_workspace, drop_database, initialize_db_with_config, test_runner, TestConfiguration,
    };
    use crate::view::{FilterItem, Operator, ViewSettings};

    fn settings() -> ViewSettings {
        ViewSettings {
            visible_fields: vec!["first_name".into(), "emails".into()],
            ..ViewSettings::default()
        }
    }

    #[rstest]
    fn create_and_list() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;

            let first = store
                .create_view(&workspace.id, RecordType::Contacts, "Everyone", &settings())
                .await
                .unwrap();
            let second = store
                .create_view(&workspace.id, RecordType::Contacts, "Donors", &settings())
                .await
                .unwrap();
            store
                .create_view(&workspace.id, RecordType::Businesses, "Companies", &settings())
                .await
                .unwrap();

            assert_eq!(first.version, 1);

            let views = store
                .get_views(&workspace.id, RecordType::Contacts)
                .await
                .unwrap();
            assert_eq!(views.len(), 2);
            assert!(views.contains(&first));
            assert!(views.contains(&second));

            let fetched = store
                .get_view(first.id.as_ref().unwrap())
                .await
                .unwrap();
            assert_eq!(fetched, Some(first));
        });
    }

    #[rstest]
    fn last_write_wins() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            let view = store
                .create_view(&workspace.id, RecordType::Contacts, "Everyone", &settings())
                .await
                .unwrap();
            let id = view.id.unwrap();

            let mut changed = settings();
            changed.filters = vec![FilterItem::new("emails", Operator::Contains, "acme")];

            let updated = store.update_view_settings(&id, &changed, None).await.unwrap();
            assert_eq!(updated.version, 2);
            assert_eq!(updated.settings, changed);

            let updated = store
                .update_view_settings(&id, &settings(), None)
                .await
                .unwrap();
            assert_eq!(updated.version, 3);
            assert!(updated.settings.filters.is_empty());
        });
    }

    #[rstest]
    fn checked_update_detects_conflicts() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            let view = store
                .create_view(&workspace.id, RecordType::Contacts, "Everyone", &settings())
                .await
                .unwrap();
            let id = view.id.unwrap();

            store
                .update_view_settings(&id, &settings(), Some(1))
                .await
                .unwrap();

            // A second writer still holds version 1
            let result = store.update_view_settings(&id, &settings(), Some(1)).await;
            assert!(matches!(
                result,
                Err(ViewStorageError::VersionConflict {
                    expected: 1,
                    actual: 2,
                    ..
                })
            ));
        });
    }

    #[tokio::test]
    async fn concurrent_unchecked_updates_all_apply() {
        let config = TestConfiguration::shared_memory(8);
        let pool = initialize_db_with_config(&config).await;
        let store = SqlStore::new(pool.clone());

        let workspace = add_workspace(&store).await;
        let view = store
            .create_view(&workspace.id, RecordType::Contacts, "Everyone", &settings())
            .await
            .unwrap();
        let id = view.id.unwrap();

        let updates = (0..32).map(|index| {
            let store = store.clone();
            let id = id.clone();
            let mut changed = settings();
            changed.filters = vec![FilterItem::new(
                "first_name",
                Operator::Equals,
                &index.to_string(),
            )];

            async move { store.update_view_settings(&id, &changed, None).await }
        });

        let results = join_all(updates).await;
        let failures: Vec<_> = results.iter().filter(|result| result.is_err()).collect();
        assert!(failures.is_empty(), "{:?}", failures);

        let view = store.get_view(&id).await.unwrap().unwrap();
        assert_eq!(view.version, 33);
        assert_eq!(view.settings.filters.len(), 1);

        pool.close().await;
        drop_database(&config.database_url).await;
    }

    #[rstest]
    fn checked_update_of_missing_view() {
        test_runner(|store: SqlStore| async move {
            assert!(matches!(
                store
                    .update_view_settings(&ViewId::random(), &settings(), Some(1))
                    .await,
                Err(ViewStorageError::NotFound(_))
            ));
        });
    }

    #[rstest]
    fn missing_view() {
        test_runner(|store: SqlStore| async move {
            let id = ViewId::random();

            assert_eq!(store.get_view(&id).await.unwrap(), None);
            assert!(matches!(
                store.update_view_settings(&id, &settings(), None).await,
                Err(ViewStorageError::NotFound(_))
            ));
        });
    }

    #[rstest]
    fn read_views_saved_without_filters() {
        test_runner(|store: SqlStore| async move {
            let workspace = add_workspace(&store).await;
            let id = ViewId::random();

            query(
                "
                INSERT INTO
                    views (id, workspace_id, record_type_id, name, settings, version, created_at)
                VALUES
                    ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(id.as_str())
            .bind(workspace.id.as_str())
            .bind(RecordType::Contacts.id())
            .bind("Legacy")
            .bind(r#"{"visible_fields":["last_name"]}"#)
            .bind(1_i64)
            .bind(0_i64)
            .execute(&store.pool)
            .await
            .unwrap();

            let view = store.get_view(&id).await.unwrap().unwrap();
            assert_eq!(view.settings.visible_fields, vec!["last_name"]);
            assert!(view.settings.filters.is_empty());
            assert!(view.settings.sorts.is_empty());
        });
    }
}

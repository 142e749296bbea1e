// SPDX-License-Identifier: AGPL-3.0-or-later

use sqlx::migrate::MigrateDatabase;
use sqlx::Any;

use crate::db::{
    connection_pool, create_database, run_pending_migrations, seed_field_definitions, Pool,
    SqlStore,
};
use crate::test_utils::{TestConfiguration, TEST_CONFIG};

/// Create test database.
pub async fn initialize_db() -> Pool {
    initialize_db_with_config(&TEST_CONFIG).await
}

/// Create test database, run all migrations and seed the built-in field definitions.
pub async fn initialize_db_with_config(config: &TestConfiguration) -> Pool {
    // Reset database first
    drop_database(&config.database_url).await;
    create_database(&config.database_url).await.unwrap();

    // Create connection pool and run all migrations
    let pool = connection_pool(&config.database_url, config.database_max_connections)
        .await
        .unwrap();
    if run_pending_migrations(&pool).await.is_err() {
        pool.close().await;
        panic!("Could not run migrations on test database");
    }

    seed_field_definitions(&SqlStore::new(pool.clone()))
        .await
        .unwrap();

    pool
}

// Delete test database
pub async fn drop_database(url: &str) {
    if Any::database_exists(url).await.unwrap() {
        Any::drop_database(url).await.unwrap();
    }
}

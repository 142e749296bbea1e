// SPDX-License-Identifier: AGPL-3.0-or-later

//! Persistent storage for the dashboard supporting both Postgres and SQLite databases.
//!
//! The main interface is [`SqlStore`] which implements the storage traits defined in
//! [`traits`]. [`MemoryStore`] implements the same traits without a database.
use anyhow::{Error, Result};
use log::debug;
use sqlx::any::{Any, AnyPool, AnyPoolOptions};
use sqlx::migrate;
use sqlx::migrate::MigrateDatabase;

use crate::db::errors::FieldStorageError;
use crate::db::traits::FieldStore;
use crate::field::all_builtin_field_definitions;

pub mod errors;
mod memory_store;
pub mod models;
pub mod stores;
pub mod traits;
pub mod utils;

pub use memory_store::MemoryStore;

/// SQL based persistent storage that implements `RecordStore`, `FieldStore`, `ViewStore` and
/// `WorkspaceStore`.
#[derive(Clone, Debug)]
pub struct SqlStore {
    pub(crate) pool: Pool,
}

impl SqlStore {
    /// Create a new `SqlStore` using the provided db `Pool`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Re-export of generic connection pool type.
pub type Pool = AnyPool;

/// Create database when not existing.
pub async fn create_database(url: &str) -> Result<()> {
    if !Any::database_exists(url).await? {
        Any::create_database(url).await?;
    }

    Ok(())
}

/// Create a database agnostic connection pool.
pub async fn connection_pool(url: &str, max_connections: u32) -> Result<Pool, Error> {
    let pool: Pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Run any pending database migrations from inside the application.
pub async fn run_pending_migrations(pool: &Pool) -> Result<()> {
    migrate!().run(pool).await?;
    Ok(())
}

/// Insert the built-in field definitions of all record types, skipping existing ones.
pub async fn seed_field_definitions<S: FieldStore + Sync>(
    store: &S,
) -> Result<u64, FieldStorageError> {
    let inserted = store
        .insert_field_definitions(&all_builtin_field_definitions())
        .await?;

    debug!("Seeded {} field definitions", inserted);

    Ok(inserted)
}

// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::Deserialize;

/// Configuration object holding all important variables throughout the application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// URL / connection string to PostgreSQL or SQLite database.
    pub database_url: String,

    /// Maximum number of connections that the database pool should maintain.
    ///
    /// Be mindful of the connection limits for the database as well as other applications which
    /// may want to connect to the same database.
    pub database_max_connections: u32,
}

impl Configuration {
    /// Returns a configuration connecting to the given database.
    pub fn new(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_owned(),
            ..Self::default()
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        // Give each in-memory SQLite database an unique name, otherwise processes might end up
        // sharing the same one. "cache=shared" is required for all pool connections to see the
        // same data.
        let db_name = format!("canvass{}", rand::random::<u32>());

        Self {
            database_url: format!("sqlite://file:{db_name}?mode=memory&cache=shared"),
            database_max_connections: 32,
        }
    }
}

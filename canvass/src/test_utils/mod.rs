// SPDX-License-Identifier: AGPL-3.0-or-later

mod config;
mod db;
mod helpers;
mod runner;

use once_cell::sync::Lazy;

pub use config::TestConfiguration;
pub use db::{drop_database, initialize_db, initialize_db_with_config};
pub use helpers::{
    add_workspace, business, contact, donation, email, new_workspace, owner, phone,
};
pub use runner::test_runner;

pub static TEST_CONFIG: Lazy<TestConfiguration> = Lazy::new(TestConfiguration::new);

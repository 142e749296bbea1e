// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(clippy::uninlined_format_args)]
mod commands;
mod config;
mod output;
mod parse;

use anyhow::Result;
use canvass::Dashboard;
use log::info;

use crate::commands::{run, Command};
use crate::config::{load_config, print_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration parameters from .toml file, environment and command line arguments
    let (config_file_path, config, command) = load_config()?;

    env_logger::Builder::new()
        .parse_filters(&config.log_filter())
        .init();

    if matches!(command, Command::Migrate) {
        println!("{}\n", print_config(&config_file_path, &config));
    }

    // Create, migrate and seed the database when needed
    let dashboard = Dashboard::start(&config.configuration()).await?;
    info!("Connected to database");

    run(&dashboard, &config.user(), command).await
}

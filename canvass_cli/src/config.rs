// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use anyhow::{bail, Result};
use canvass::{Configuration, UserId};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::commands::Command;

const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "off";

const DEFAULT_DATABASE_URL: &str = "sqlite:canvass.sqlite3";

const DEFAULT_MAX_DATABASE_CONNECTIONS: u32 = 32;

const DEFAULT_USER_ID: &str = "local";

/// Keys which can be set through environment variables.
const ENV_KEYS: [&str; 4] = [
    "database_url",
    "database_max_connections",
    "log_level",
    "user_id",
];

type ConfigFilePath = Option<PathBuf>;

/// Settings which can be de/serialized from a config file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    /// Set log verbosity, scoped to "canvass" unless a full filter like "canvass=INFO,sqlx=WARN"
    /// is given.
    pub log_level: String,

    /// URL / connection string to PostgreSQL or SQLite database.
    pub database_url: String,

    /// Max database connections, defaults to 32.
    pub database_max_connections: u32,

    /// Identifier of the user running the commands, used for workspace membership.
    pub user_id: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            database_max_connections: DEFAULT_MAX_DATABASE_CONNECTIONS,
            user_id: DEFAULT_USER_ID.into(),
        }
    }
}

impl ConfigFile {
    /// Library configuration for connecting to the database.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            database_url: self.database_url.clone(),
            database_max_connections: self.database_max_connections,
        }
    }

    /// User running the commands.
    pub fn user(&self) -> UserId {
        UserId::from(self.user_id.as_str())
    }

    /// Filter string for `env_logger`.
    pub fn log_filter(&self) -> String {
        if self.log_level.contains('=') {
            self.log_level.clone()
        } else {
            format!("canvass={}", self.log_level)
        }
    }
}

/// Command line arguments.
///
/// All settings are optional and don't get serialized to Figment when they're None, so they only
/// override earlier sources when they were actually given.
#[derive(Parser, Serialize, Debug)]
#[command(
    name = "canvass",
    about = "Contacts, businesses and donations for political organizations",
    long_about = None,
    version
)]
pub struct Cli {
    /// Path to an optional "config.toml" file for further configuration.
    ///
    /// When not set the program will try to find a `config.toml` file in the folder the program
    /// is executed in and otherwise in the XDG config directory
    /// ("$HOME/.config/canvass/config.toml" on Linux).
    #[arg(short = 'c', long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,

    /// URL / connection string to PostgreSQL or SQLite database. Defaults to "canvass.sqlite3" in
    /// the current folder.
    #[arg(short = 'd', long, value_name = "CONNECTION_STRING")]
    #[serde(skip_serializing_if = "Option::is_none")]
    database_url: Option<String>,

    /// Max database connections, defaults to 32.
    #[arg(long, value_name = "NUM")]
    #[serde(skip_serializing_if = "Option::is_none")]
    database_max_connections: Option<u32>,

    /// Set log verbosity. Possible log levels are: ERROR, WARN, INFO, DEBUG, TRACE.
    #[arg(short = 'l', long, value_name = "LEVEL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,

    /// Identifier of the user running the commands. Defaults to "local".
    #[arg(short = 'u', long, value_name = "USER_ID")]
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,

    #[command(subcommand)]
    #[serde(skip)]
    pub command: Command,
}

/// Get configuration from 1. .toml file, 2. environment variables and 3. command line arguments
/// (in that order, meaning that later configuration sources take precedence over the earlier
/// ones).
pub fn load_config() -> Result<(ConfigFilePath, ConfigFile, Command)> {
    let cli = Cli::parse();

    // Determine if a config file path was provided or if we should look for it in common locations
    let config_file_path: ConfigFilePath = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }

            Some(path.clone())
        }
        None => try_determine_config_file_path(),
    };

    let config = figment(&config_file_path, &cli).extract()?;

    Ok((config_file_path, config, cli.command))
}

fn figment(config_file_path: &ConfigFilePath, cli: &Cli) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(ConfigFile::default()));
    if let Some(path) = config_file_path {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::raw().only(&ENV_KEYS))
        .merge(Serialized::defaults(cli))
}

fn try_determine_config_file_path() -> Option<PathBuf> {
    // Find config file in current folder
    let current_dir = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_FILE_NAME));

    // Find config file in XDG config folder
    let xdg_config_dir = ProjectDirs::from("", "", "canvass")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME));

    vec![current_dir, xdg_config_dir]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
}

/// Describes where the configuration came from and which database is used.
pub fn print_config(config_file_path: &ConfigFilePath, config: &ConfigFile) -> String {
    let config_file = match config_file_path {
        Some(path) => path.display().to_string(),
        None => "none".into(),
    };

    let database_url = if config.database_url.contains("mode=memory") {
        "memory (data is not persisted)".into()
    } else if config.database_url.contains("sqlite:") {
        format!("SQLite: {}", config.database_url)
    } else {
        "PostgreSQL".into()
    };

    format!(
        "Config file: {}\nDatabase: {}\nUser: {}",
        config_file.blue(),
        database_url.blue(),
        config.user_id.blue(),
    )
}

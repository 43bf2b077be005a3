// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command-line configuration and its validation.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gymhours::Clock;
use gymhours_domain::{FactoryConfig, HourFactory};
use gymhours_persistence::{Persistence, PersistenceError, PersistenceOptions};

/// Gym Hours Server - HTTP server for trainer hours and trainings
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding one `SQLite` database per context. If not provided, uses in-memory databases.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// `MySQL`/`MariaDB` connection URL, used instead of `SQLite`
    #[cfg(feature = "mysql")]
    #[arg(long, conflicts_with = "database")]
    pub mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Maximum number of pooled connections per store
    #[arg(long, default_value_t = 8)]
    pub pool_size: u32,

    /// How long a writer waits for a locked row before giving up
    #[arg(long, default_value_t = 5000)]
    pub lock_timeout_ms: u64,

    /// How many weeks ahead the trainer may edit the calendar
    #[arg(long, default_value_t = 6)]
    pub max_weeks_in_the_future: u8,

    /// Earliest UTC hour of the day that may be opened
    #[arg(long, default_value_t = 12)]
    pub min_utc_hour: u8,

    /// Latest UTC hour of the day that may be opened
    #[arg(long, default_value_t = 20)]
    pub max_utc_hour: u8,
}

/// Where the stores live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Directory(PathBuf),
    #[cfg(feature = "mysql")]
    Mysql(String),
}

impl StorageConfig {
    /// Opens the stores, running migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a database cannot be opened or migrated.
    pub fn open(
        &self,
        factory: HourFactory,
        clock: Arc<dyn Clock>,
        options: PersistenceOptions,
    ) -> Result<Persistence, PersistenceError> {
        match self {
            Self::InMemory => Persistence::new_in_memory(factory, clock, options),
            Self::Directory(dir) => Persistence::new_with_dir(dir, factory, clock, options),
            #[cfg(feature = "mysql")]
            Self::Mysql(url) => Persistence::new_with_mysql(url, factory, clock, options),
        }
    }
}

/// Every problem found in the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub problems: Vec<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid configuration: {}", self.problems.join("; "))
    }
}

impl std::error::Error for ConfigError {}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub storage: StorageConfig,
    pub persistence: PersistenceOptions,
    pub factory: HourFactory,
}

impl ServerConfig {
    /// Checks the arguments, reporting all problems at once.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` listing every invalid setting.
    pub fn validate(args: &Args) -> Result<Self, ConfigError> {
        let mut problems: Vec<String> = Vec::new();

        let ip: Option<IpAddr> = match args.bind.parse() {
            Ok(ip) => Some(ip),
            Err(_) => {
                problems.push(format!("bind address '{}' is not an IP address", args.bind));
                None
            }
        };
        if args.pool_size == 0 {
            problems.push(String::from("pool size must be at least 1"));
        }
        if args.lock_timeout_ms == 0 {
            problems.push(String::from("lock timeout must be greater than 0 ms"));
        }

        let factory = match HourFactory::new(FactoryConfig {
            max_weeks_in_the_future_to_set: args.max_weeks_in_the_future,
            min_utc_hour: args.min_utc_hour,
            max_utc_hour: args.max_utc_hour,
        }) {
            Ok(factory) => Some(factory),
            Err(e) => {
                problems.push(e.to_string());
                None
            }
        };

        match (ip, factory) {
            (Some(ip), Some(factory)) if problems.is_empty() => Ok(Self {
                addr: SocketAddr::new(ip, args.port),
                storage: storage_from_args(args),
                persistence: PersistenceOptions {
                    pool_size: args.pool_size,
                    lock_timeout: Duration::from_millis(args.lock_timeout_ms),
                },
                factory,
            }),
            _ => Err(ConfigError { problems }),
        }
    }
}

fn storage_from_args(args: &Args) -> StorageConfig {
    #[cfg(feature = "mysql")]
    if let Some(url) = &args.mysql_url {
        return StorageConfig::Mysql(url.clone());
    }
    args.database
        .clone()
        .map_or(StorageConfig::InMemory, StorageConfig::Directory)
}

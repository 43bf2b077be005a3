// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module is limited to:
//! - Pool construction and per-connection PRAGMA setup
//! - Migration execution
//! - The `PersistenceBackend` implementation

use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::{RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::PersistenceBackend;
use crate::data_models::{HourRow, TrainingRow};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// SQLite-specific migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Applies connection-scoped PRAGMAs every time the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqliteCustomizer {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
        diesel::sql_query(format!(
            "PRAGMA busy_timeout = {}",
            self.busy_timeout.as_millis()
        ))
        .execute(conn)
        .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// How a `SQLite` database is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteMode {
    /// A shared-cache in-memory database. Shared-cache mode uses table
    /// locks that ignore the busy timeout, so the pool keeps exactly one
    /// connection and never recycles it.
    InMemory,
    /// A database file in WAL mode.
    File,
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Opens a pool on `database_url` and migrates the schema.
///
/// # Arguments
///
/// * `database_url` - A file path or an `SQLite` URI
/// * `mode` - Whether the database lives in memory or on disk
/// * `pool_size` - Connections to keep; ignored for in-memory databases
/// * `lock_timeout` - Busy timeout, also used as the pool checkout timeout
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_pool(
    database_url: &str,
    mode: SqliteMode,
    pool_size: u32,
    lock_timeout: Duration,
) -> Result<SqlitePool, PersistenceError> {
    info!(database_url, ?mode, pool_size, "Initializing SQLite database");

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder()
        .connection_customizer(Box::new(SqliteCustomizer {
            busy_timeout: lock_timeout,
        }))
        .connection_timeout(lock_timeout);
    let builder = match mode {
        SqliteMode::InMemory => builder
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None),
        SqliteMode::File => builder.max_size(pool_size.max(1)),
    };
    let pool = builder
        .build(manager)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    let mut conn = pool.get()?;
    if mode == SqliteMode::File {
        enable_wal_mode(&mut conn)?;
    }
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    drop(conn);

    Ok(pool)
}

impl PersistenceBackend for SqliteConnection {
    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.immediate_transaction(f)
    }

    fn lock_hour(&mut self, hour_time: i64) -> Result<Option<HourRow>, PersistenceError> {
        // The IMMEDIATE transaction already holds the write lock.
        queries::hours::find_hour_sqlite(self, hour_time)
    }

    fn insert_hour_if_missing(
        &mut self,
        hour_time: i64,
        availability: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::hours::insert_hour_if_missing_sqlite(self, hour_time, availability)
    }

    fn set_hour_availability(
        &mut self,
        hour_id: i64,
        availability: &str,
    ) -> Result<(), PersistenceError> {
        mutations::hours::set_hour_availability_sqlite(self, hour_id, availability)
    }

    fn lock_training(
        &mut self,
        training_id: &str,
    ) -> Result<Option<TrainingRow>, PersistenceError> {
        queries::trainings::find_training_sqlite(self, training_id)
    }

    fn save_training(&mut self, row: &TrainingRow) -> Result<(), PersistenceError> {
        mutations::trainings::save_training_sqlite(self, row)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! Compiled only with the `mysql` cargo feature, which needs the `MySQL`
//! client libraries at build time. Validation tests against a real server
//! are marked `#[ignore]` and run by `cargo xtask test-mariadb`.
//!
//! Migration directories MUST remain schema-equivalent: every change to
//! `migrations/` needs its counterpart in `migrations_mysql/`.

use std::time::Duration;

use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::{Connection, MysqlConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::PersistenceBackend;
use crate::data_models::{HourRow, TrainingRow};
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// `MySQL`-specific migrations.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

pub type MysqlPool = Pool<ConnectionManager<MysqlConnection>>;

/// Bounds row lock waits for every pooled connection.
#[derive(Debug, Clone, Copy)]
struct MysqlCustomizer {
    lock_wait_seconds: u64,
}

impl CustomizeConnection<MysqlConnection, diesel::r2d2::Error> for MysqlCustomizer {
    fn on_acquire(&self, conn: &mut MysqlConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!(
            "SET SESSION innodb_lock_wait_timeout = {}",
            self.lock_wait_seconds
        ))
        .execute(conn)
        .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Run pending migrations on the provided `MySQL` connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Opens a pool on `database_url` and migrates the schema.
///
/// `innodb_lock_wait_timeout` has a resolution of one second, so
/// `lock_timeout` is rounded up.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_pool(
    database_url: &str,
    pool_size: u32,
    lock_timeout: Duration,
) -> Result<MysqlPool, PersistenceError> {
    info!(pool_size, "Initializing MySQL database");

    let lock_wait_seconds = lock_timeout.as_secs() + u64::from(lock_timeout.subsec_nanos() > 0);
    let pool = Pool::builder()
        .max_size(pool_size.max(1))
        .connection_timeout(lock_timeout)
        .connection_customizer(Box::new(MysqlCustomizer {
            lock_wait_seconds: lock_wait_seconds.max(1),
        }))
        .build(ConnectionManager::<MysqlConnection>::new(database_url))
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    drop(conn);

    Ok(pool)
}

impl PersistenceBackend for MysqlConnection {
    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.transaction(f)
    }

    fn lock_hour(&mut self, hour_time: i64) -> Result<Option<HourRow>, PersistenceError> {
        queries::hours::lock_hour_mysql(self, hour_time)
    }

    fn insert_hour_if_missing(
        &mut self,
        hour_time: i64,
        availability: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::hours::insert_hour_if_missing_mysql(self, hour_time, availability)
    }

    fn set_hour_availability(
        &mut self,
        hour_id: i64,
        availability: &str,
    ) -> Result<(), PersistenceError> {
        mutations::hours::set_hour_availability_mysql(self, hour_id, availability)
    }

    fn lock_training(
        &mut self,
        training_id: &str,
    ) -> Result<Option<TrainingRow>, PersistenceError> {
        queries::trainings::lock_training_mysql(self, training_id)
    }

    fn save_training(&mut self, row: &TrainingRow) -> Result<(), PersistenceError> {
        mutations::trainings::save_training_mysql(self, row)
    }
}

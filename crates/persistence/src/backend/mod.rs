// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates what cannot be expressed in backend-agnostic Diesel
//! DSL: connection setup, migrations, and how an exclusive lock on a single
//! row is taken.
//!
//! - `sqlite` - `SQLite` backend (default for development and testing)
//! - `mysql` - MySQL/MariaDB backend (cargo feature `mysql`)
//!
//! `SQLite` has no row locks. A `BEGIN IMMEDIATE` transaction takes the
//! database write lock up front, which serializes every writer of that
//! database and makes a plain `SELECT` inside it as good as a locking read.
//! `MySQL` runs an ordinary transaction and locks the row with
//! `SELECT ... FOR UPDATE`.

#[cfg(feature = "mysql")]
pub mod mysql;
pub mod sqlite;

use diesel::Connection;

use crate::data_models::{HourRow, TrainingRow};
use crate::error::PersistenceError;

/// Operations whose SQL differs per backend.
///
/// The repository algorithms in `repositories` are written once, generic
/// over this trait.
pub trait PersistenceBackend: Connection {
    /// Runs `f` inside a transaction that holds its locks until commit.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, or the error of `BEGIN`/`COMMIT`. The
    /// transaction is rolled back on any error.
    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>;

    /// Reads the hour row at `hour_time` and locks it for the rest of the
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the lock wait times out.
    fn lock_hour(&mut self, hour_time: i64) -> Result<Option<HourRow>, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn insert_hour_if_missing(
        &mut self,
        hour_time: i64,
        availability: &str,
    ) -> Result<usize, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn set_hour_availability(
        &mut self,
        hour_id: i64,
        availability: &str,
    ) -> Result<(), PersistenceError>;

    /// Reads the training row and locks it for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the lock wait times out.
    fn lock_training(&mut self, training_id: &str)
    -> Result<Option<TrainingRow>, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn save_training(&mut self, row: &TrainingRow) -> Result<(), PersistenceError>;
}

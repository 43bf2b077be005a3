// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guarded updates, written once over [`PersistenceBackend`].
//!
//! A transition rejected by the domain rolls the transaction back and is
//! returned unchanged; storage failures become `StorageError`s.

use gymhours::{AppError, HourTransition, TrainingTransition};
use gymhours_domain::{Hour, HourFactory, Training, User, can_user_see_training};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{TrainingRow, to_timestamp};
use crate::error::PersistenceError;

/// Attempts of one hour update before a deadlock is surfaced.
pub const MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Why a guarded transaction was rolled back.
enum UpdateError {
    Db(PersistenceError),
    Rejected(AppError),
}

impl From<diesel::result::Error> for UpdateError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(err.into())
    }
}

impl From<PersistenceError> for UpdateError {
    fn from(err: PersistenceError) -> Self {
        Self::Db(err)
    }
}

impl UpdateError {
    fn rejected(err: impl Into<AppError>) -> Self {
        Self::Rejected(err.into())
    }

    fn into_app_error(self) -> AppError {
        match self {
            Self::Db(err) => err.into(),
            Self::Rejected(err) => err,
        }
    }
}

/// Applies `update` to the hour at `time` under an exclusive lock.
///
/// A missing row is validated by the factory and inserted as not available
/// with insert-or-ignore, then read again under the lock, so concurrent
/// first touches of the same hour converge on one row. A transaction lost
/// to a deadlock is retried up to [`MAX_UPDATE_ATTEMPTS`] times.
///
/// # Errors
///
/// Returns the transition error, a validation error for an invalid new
/// hour, or a storage error.
pub fn update_hour<C: PersistenceBackend>(
    conn: &mut C,
    factory: &HourFactory,
    now: OffsetDateTime,
    time: OffsetDateTime,
    update: HourTransition<'_>,
) -> Result<Hour, AppError> {
    let hour_time = to_timestamp(time);
    let mut attempt: u32 = 1;
    loop {
        let result = conn.exclusive_transaction(|conn| {
            update_hour_once(conn, factory, now, time, hour_time, update)
        });
        match result {
            Ok(hour) => return Ok(hour),
            Err(UpdateError::Db(err)) if err.is_deadlock() && attempt < MAX_UPDATE_ATTEMPTS => {
                warn!(hour_time, attempt, error = %err, "Trainer hour update deadlocked, retrying");
                attempt += 1;
            }
            Err(err) => return Err(err.into_app_error()),
        }
    }
}

fn update_hour_once<C: PersistenceBackend>(
    conn: &mut C,
    factory: &HourFactory,
    now: OffsetDateTime,
    time: OffsetDateTime,
    hour_time: i64,
    update: HourTransition<'_>,
) -> Result<Hour, UpdateError> {
    let row = if let Some(row) = conn.lock_hour(hour_time)? {
        row
    } else {
        let fresh = factory
            .new_not_available_hour(time, now)
            .map_err(UpdateError::rejected)?;
        let inserted = conn.insert_hour_if_missing(hour_time, fresh.availability().as_str())?;
        debug!(hour_time, inserted, "Trainer hour was missing");
        conn.lock_hour(hour_time)?.ok_or_else(|| {
            PersistenceError::NotFound(format!("trainer hour {hour_time} after insert"))
        })?
    };

    let hour_id = row.hour_id;
    let hour = row.into_domain(factory)?;
    let updated = update(hour).map_err(UpdateError::Rejected)?;
    conn.set_hour_availability(hour_id, updated.availability().as_str())?;
    Ok(updated)
}

/// Applies `update` to a training under an exclusive lock, after checking
/// that `user` may see it.
///
/// # Errors
///
/// Returns not-found, an authorization error, the transition error, or a
/// storage error.
pub fn update_training<C: PersistenceBackend>(
    conn: &mut C,
    training_id: &str,
    user: &User,
    update: TrainingTransition<'_>,
) -> Result<Training, AppError> {
    conn.exclusive_transaction(|conn| -> Result<Training, UpdateError> {
        let row = conn
            .lock_training(training_id)?
            .ok_or_else(|| UpdateError::Rejected(AppError::not_found("training", training_id)))?;
        let training = row.into_domain()?;
        can_user_see_training(user, &training).map_err(UpdateError::rejected)?;

        let updated = update(training).map_err(UpdateError::Rejected)?;
        conn.save_training(&TrainingRow::from_domain(&updated))?;
        Ok(updated)
    })
    .map_err(UpdateError::into_app_error)
}

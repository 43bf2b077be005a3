// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Boundaries between the handlers and the outside world.
//!
//! Repositories are implemented by the persistence crate (Diesel) and by
//! the in-memory adapters in [`crate::memory`]. Services stand for the
//! other bounded contexts; [`crate::services`] provides in-process
//! adapters.

use crate::error::AppError;
use gymhours_domain::{Hour, Training, User, UserAccount};
use time::OffsetDateTime;

/// Pure transition applied to an hour under the repository's lock.
///
/// It may be invoked more than once if the storage retries the transaction.
pub type HourTransition<'a> = &'a dyn Fn(Hour) -> Result<Hour, AppError>;

/// Transition applied to a training under the repository's lock.
pub type TrainingTransition<'a> = &'a dyn Fn(Training) -> Result<Training, AppError>;

/// Transactional access to trainer hours.
pub trait HourRepository: Send + Sync {
    /// Reads an hour without locking. `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    fn get_hour(&self, time: OffsetDateTime) -> Result<Option<Hour>, AppError>;

    /// Runs `update` against the hour at `time` while holding an exclusive
    /// lock on it, and persists the result.
    ///
    /// An hour that was never written is created as not available (through
    /// the hour factory, so the time must be valid) before `update` runs.
    /// If `update` fails nothing is written and its error is returned.
    ///
    /// # Errors
    ///
    /// Returns the transition error, a validation error for an invalid new
    /// hour, or a storage error (including lock timeouts).
    fn update_hour(
        &self,
        time: OffsetDateTime,
        update: HourTransition<'_>,
    ) -> Result<Hour, AppError>;
}

/// Read side of the trainer calendar.
pub trait AvailableHoursReadModel: Send + Sync {
    /// Returns every stored hour in `[from, to]`, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    fn hours_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Hour>, AppError>;
}

/// Transactional access to trainings.
pub trait TrainingRepository: Send + Sync {
    /// Stores a new training.
    ///
    /// # Errors
    ///
    /// Returns a conflict if a training with the same id exists.
    fn add_training(&self, training: &Training) -> Result<(), AppError>;

    /// Reads a training on behalf of `user`.
    ///
    /// # Errors
    ///
    /// Returns not-found if it does not exist, or an authorization error if
    /// `user` may not see it.
    fn get_training(&self, training_uuid: &str, user: &User) -> Result<Training, AppError>;

    /// Runs `update` against the training while holding an exclusive lock on
    /// it, and persists the result. Visibility is checked before `update`
    /// runs.
    ///
    /// # Errors
    ///
    /// Returns not-found, an authorization error, the transition error, or a
    /// storage error.
    fn update_training(
        &self,
        training_uuid: &str,
        user: &User,
        update: TrainingTransition<'_>,
    ) -> Result<Training, AppError>;
}

/// Read side of the trainings context.
pub trait TrainingsReadModel: Send + Sync {
    /// Returns every training, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    fn all_trainings(&self) -> Result<Vec<Training>, AppError>;

    /// Returns the non-canceled trainings of one attendee, ordered by time.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    fn find_trainings_for_user(&self, user_uuid: &str) -> Result<Vec<Training>, AppError>;
}

/// Storage of user accounts.
pub trait UserRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns a conflict if the account exists.
    fn add_user(&self, account: &UserAccount) -> Result<(), AppError>;

    /// # Errors
    ///
    /// Returns not-found if the account does not exist.
    fn get_user(&self, user_uuid: &str) -> Result<UserAccount, AppError>;

    /// Atomically adds `amount_change` to the balance and returns the new
    /// balance. The balance never drops below zero.
    ///
    /// # Errors
    ///
    /// Returns not-found, or `InsufficientBalance` when the change would
    /// make the balance negative.
    fn update_balance(&self, user_uuid: &str, amount_change: i64) -> Result<i64, AppError>;

    /// # Errors
    ///
    /// Returns not-found if the account does not exist.
    fn update_last_ip(&self, user_uuid: &str, ip: &str) -> Result<(), AppError>;
}

/// The trainer context, as seen from the trainings context.
pub trait TrainerService: Send + Sync {
    /// Books the hour.
    ///
    /// # Errors
    ///
    /// Fails if the hour is not available or the trainer is unreachable.
    fn schedule_training(&self, time: OffsetDateTime) -> Result<(), AppError>;

    /// Releases the hour.
    ///
    /// # Errors
    ///
    /// Fails if no training is booked or the trainer is unreachable.
    fn cancel_training(&self, time: OffsetDateTime) -> Result<(), AppError>;

    /// Books `new_time`, then releases `original_time`.
    ///
    /// # Errors
    ///
    /// Fails if either step fails. A failure of the second step leaves the
    /// new hour booked.
    fn move_training(
        &self,
        new_time: OffsetDateTime,
        original_time: OffsetDateTime,
    ) -> Result<(), AppError>;
}

/// The users context, as seen from the trainings context.
pub trait UserService: Send + Sync {
    /// Adds `amount_change` to the user's training balance.
    ///
    /// # Errors
    ///
    /// Fails if the user does not exist, the balance would become negative,
    /// or the service is unreachable.
    fn update_training_balance(&self, user_uuid: &str, amount_change: i64)
    -> Result<(), AppError>;
}

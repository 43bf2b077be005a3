// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The training aggregate.
//!
//! A training is booked by an attendee into a trainer hour. Once it is
//! canceled it is frozen: every mutator refuses to run. Reschedule
//! negotiation lives in the `reschedule` module.

use crate::error::DomainError;
use crate::reschedule::RescheduleProposal;
use crate::user::UserType;
use time::{Duration, OffsetDateTime};

/// Maximum length of training notes, in characters.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Trainings closer than this can no longer be canceled for free or
/// rescheduled directly.
pub const FREE_CANCELLATION_WINDOW: Duration = Duration::hours(24);

/// A booked training session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    uuid: String,
    user_uuid: String,
    user_name: String,
    time: OffsetDateTime,
    notes: String,
    pub(crate) proposed_reschedule: Option<RescheduleProposal>,
    canceled: bool,
}

impl Training {
    /// Creates a new training.
    ///
    /// # Arguments
    ///
    /// * `uuid` - Identifier of the training
    /// * `user_uuid` - The attendee who owns the training
    /// * `user_name` - Display name of the attendee at booking time
    /// * `time` - Start of the booked hour
    /// * `notes` - Free-form notes
    ///
    /// # Errors
    ///
    /// Returns an error if an identifier or the name is empty, or the notes
    /// are too long.
    pub fn new(
        uuid: &str,
        user_uuid: &str,
        user_name: &str,
        time: OffsetDateTime,
        notes: &str,
    ) -> Result<Self, DomainError> {
        if uuid.trim().is_empty() {
            return Err(DomainError::MissingTrainingField("uuid"));
        }
        if user_uuid.trim().is_empty() {
            return Err(DomainError::MissingTrainingField("user uuid"));
        }
        if user_name.trim().is_empty() {
            return Err(DomainError::MissingTrainingField("user name"));
        }
        validate_notes(notes)?;

        Ok(Self {
            uuid: uuid.to_string(),
            user_uuid: user_uuid.to_string(),
            user_name: user_name.to_string(),
            time,
            notes: notes.to_string(),
            proposed_reschedule: None,
            canceled: false,
        })
    }

    /// Rebuilds a training from storage without re-running validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn unmarshal_from_database(
        uuid: String,
        user_uuid: String,
        user_name: String,
        time: OffsetDateTime,
        notes: String,
        canceled: bool,
        proposed_reschedule: Option<RescheduleProposal>,
    ) -> Self {
        Self {
            uuid,
            user_uuid,
            user_name,
            time,
            notes,
            proposed_reschedule,
            canceled,
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    #[must_use]
    pub fn user_uuid(&self) -> &str {
        &self.user_uuid
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub const fn time(&self) -> OffsetDateTime {
        self.time
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Replaces the notes.
    ///
    /// # Errors
    ///
    /// Fails if the training is canceled or the notes are too long.
    pub fn update_notes(&mut self, notes: &str) -> Result<(), DomainError> {
        self.ensure_not_canceled()?;
        validate_notes(notes)?;
        self.notes = notes.to_string();
        Ok(())
    }

    /// Cancels the training.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TrainingAlreadyCanceled` on a second call.
    pub const fn cancel(&mut self) -> Result<(), DomainError> {
        if self.canceled {
            return Err(DomainError::TrainingAlreadyCanceled);
        }
        self.canceled = true;
        Ok(())
    }

    /// Returns true while at least 24 hours remain before the training.
    #[must_use]
    pub fn can_be_canceled_for_free(&self, now: OffsetDateTime) -> bool {
        self.time - now >= FREE_CANCELLATION_WINDOW
    }

    /// Moves the training directly to `new_time`.
    ///
    /// Only allowed while the training can still be canceled for free.
    ///
    /// # Errors
    ///
    /// Fails if the training is canceled or too close to reschedule.
    pub fn reschedule_training(
        &mut self,
        new_time: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        self.ensure_not_canceled()?;
        if !self.can_be_canceled_for_free(now) {
            return Err(DomainError::CantRescheduleBeforeTime {
                training_time: self.time,
            });
        }
        self.time = new_time;
        Ok(())
    }

    pub(crate) const fn set_time(&mut self, time: OffsetDateTime) {
        self.time = time;
    }

    pub(crate) const fn ensure_not_canceled(&self) -> Result<(), DomainError> {
        if self.canceled {
            return Err(DomainError::TrainingCanceled);
        }
        Ok(())
    }
}

/// Balance credits returned to the attendee when a training is canceled.
///
/// Free cancellations refund the credit. Late cancellations by the trainer
/// refund it and add one more as compensation; late cancellations by the
/// attendee forfeit it.
#[must_use]
pub fn cancel_balance_delta(
    training: &Training,
    canceling_user_type: UserType,
    now: OffsetDateTime,
) -> i64 {
    if training.can_be_canceled_for_free(now) {
        return 1;
    }
    match canceling_user_type {
        UserType::Trainer => 2,
        UserType::Attendee => 0,
    }
}

fn validate_notes(notes: &str) -> Result<(), DomainError> {
    let length = notes.chars().count();
    if length > MAX_NOTES_LENGTH {
        return Err(DomainError::NotesTooLong {
            length,
            max: MAX_NOTES_LENGTH,
        });
    }
    Ok(())
}

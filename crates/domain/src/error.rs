// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use crate::user::UserType;

/// Coarse classification shared by every error in the system.
///
/// Outer layers use the kind to decide how a failure is reported
/// (client fault vs. server fault) without inspecting concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input violates a rule and will never succeed as submitted.
    Validation,
    /// The input is well formed but conflicts with the current state.
    Conflict,
    /// The referenced entity does not exist.
    NotFound,
    /// The caller may not see or act on the entity.
    Authorization,
    /// Storage, locking or a remote service failed.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by domain rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The hour factory configuration is inconsistent.
    InvalidFactoryConfig(String),
    /// The hour does not start on a full hour.
    NotFullHour {
        /// The rejected time.
        hour: OffsetDateTime,
    },
    /// The hour is further in the future than the factory allows.
    TooDistantDate {
        /// The configured window.
        max_weeks: u8,
        /// The rejected time.
        hour: OffsetDateTime,
    },
    /// The hour is the current hour or already in the past.
    PastHour {
        /// The rejected time.
        hour: OffsetDateTime,
    },
    /// The hour is earlier in the day than the factory allows.
    TooEarlyHour {
        /// The earliest allowed UTC hour.
        min_utc_hour: u8,
        /// The rejected time.
        hour: OffsetDateTime,
    },
    /// The hour is later in the day than the factory allows.
    TooLateHour {
        /// The latest allowed UTC hour.
        max_utc_hour: u8,
        /// The rejected time.
        hour: OffsetDateTime,
    },
    /// An availability string could not be parsed.
    InvalidAvailability(String),
    /// The hour carries a scheduled training and cannot be modified.
    TrainingScheduled,
    /// The hour has no scheduled training to cancel.
    NoTrainingScheduled,
    /// The hour is not available for scheduling.
    HourNotAvailable,
    /// The hour is already available.
    HourAlreadyAvailable,
    /// The hour is already not available.
    HourAlreadyNotAvailable,
    /// A required training field is empty.
    MissingTrainingField(&'static str),
    /// Training notes exceed the allowed length.
    NotesTooLong {
        /// Length of the submitted notes in characters.
        length: usize,
        /// Maximum allowed length in characters.
        max: usize,
    },
    /// The training was canceled and cannot be modified.
    TrainingCanceled,
    /// The training was already canceled.
    TrainingAlreadyCanceled,
    /// The training is too close to be rescheduled directly.
    CantRescheduleBeforeTime {
        /// The current training time.
        training_time: OffsetDateTime,
    },
    /// Approve or reject was called without a pending proposal.
    NoRescheduleRequested,
    /// The proposer tried to approve their own proposal.
    SameUserTypeApproval {
        /// Role that both proposed and tried to approve.
        user_type: UserType,
    },
    /// A user type string could not be parsed.
    InvalidUserType(String),
    /// A required user field is empty.
    MissingUserField(&'static str),
    /// The user may not see the training.
    ForbiddenToSeeTraining {
        /// The requesting user.
        user_uuid: String,
        /// The training owner.
        owner_uuid: String,
    },
    /// The balance change would drive the balance below zero.
    InsufficientBalance {
        /// The affected user.
        user_uuid: String,
        /// The balance before the change.
        balance: i64,
        /// The requested change.
        amount_change: i64,
    },
    /// A query range ends before it starts.
    InvalidDateRange {
        /// Range start.
        from: OffsetDateTime,
        /// Range end.
        to: OffsetDateTime,
    },
}

impl DomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFactoryConfig(_)
            | Self::NotFullHour { .. }
            | Self::TooDistantDate { .. }
            | Self::PastHour { .. }
            | Self::TooEarlyHour { .. }
            | Self::TooLateHour { .. }
            | Self::InvalidAvailability(_)
            | Self::MissingTrainingField(_)
            | Self::NotesTooLong { .. }
            | Self::InvalidUserType(_)
            | Self::MissingUserField(_)
            | Self::InvalidDateRange { .. } => ErrorKind::Validation,
            Self::TrainingScheduled
            | Self::NoTrainingScheduled
            | Self::HourNotAvailable
            | Self::HourAlreadyAvailable
            | Self::HourAlreadyNotAvailable
            | Self::TrainingCanceled
            | Self::TrainingAlreadyCanceled
            | Self::CantRescheduleBeforeTime { .. }
            | Self::NoRescheduleRequested
            | Self::SameUserTypeApproval { .. }
            | Self::InsufficientBalance { .. } => ErrorKind::Conflict,
            Self::ForbiddenToSeeTraining { .. } => ErrorKind::Authorization,
        }
    }

    /// Returns a stable, machine-readable identifier for the rule that failed.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::InvalidFactoryConfig(_) => "invalid-factory-config",
            Self::NotFullHour { .. } => "hour-not-full-hour",
            Self::TooDistantDate { .. } => "hour-too-distant",
            Self::PastHour { .. } => "hour-in-the-past",
            Self::TooEarlyHour { .. } => "hour-too-early",
            Self::TooLateHour { .. } => "hour-too-late",
            Self::InvalidAvailability(_) => "invalid-availability",
            Self::TrainingScheduled => "training-scheduled",
            Self::NoTrainingScheduled => "no-training-scheduled",
            Self::HourNotAvailable => "hour-not-available",
            Self::HourAlreadyAvailable => "hour-already-available",
            Self::HourAlreadyNotAvailable => "hour-already-not-available",
            Self::MissingTrainingField(_) => "invalid-training-data",
            Self::NotesTooLong { .. } => "notes-too-long",
            Self::TrainingCanceled => "training-canceled",
            Self::TrainingAlreadyCanceled => "training-already-canceled",
            Self::CantRescheduleBeforeTime { .. } => "cant-reschedule-before-time",
            Self::NoRescheduleRequested => "no-reschedule-requested",
            Self::SameUserTypeApproval { .. } => "same-user-type-approval",
            Self::InvalidUserType(_) => "invalid-user-type",
            Self::MissingUserField(_) => "invalid-user-data",
            Self::ForbiddenToSeeTraining { .. } => "forbidden-to-see-training",
            Self::InsufficientBalance { .. } => "insufficient-balance",
            Self::InvalidDateRange { .. } => "invalid-date-range",
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFactoryConfig(msg) => write!(f, "Invalid hour factory config: {msg}"),
            Self::NotFullHour { hour } => write!(f, "Hour {hour} is not a full hour"),
            Self::TooDistantDate { max_weeks, hour } => write!(
                f,
                "Schedule can be only set for next {max_weeks} weeks, provided date: {hour}"
            ),
            Self::PastHour { hour } => write!(f, "Cannot create hour from the past: {hour}"),
            Self::TooEarlyHour { min_utc_hour, hour } => write!(
                f,
                "Too early hour {hour}, min UTC hour: {min_utc_hour}"
            ),
            Self::TooLateHour { max_utc_hour, hour } => write!(
                f,
                "Too late hour {hour}, max UTC hour: {max_utc_hour}"
            ),
            Self::InvalidAvailability(value) => write!(f, "Invalid availability: {value}"),
            Self::TrainingScheduled => {
                write!(f, "Unable to modify hour, because scheduled training")
            }
            Self::NoTrainingScheduled => write!(f, "Training is not scheduled"),
            Self::HourNotAvailable => write!(f, "Hour is not available"),
            Self::HourAlreadyAvailable => write!(f, "Hour is already available"),
            Self::HourAlreadyNotAvailable => write!(f, "Hour is already not available"),
            Self::MissingTrainingField(field) => write!(f, "Empty training {field}"),
            Self::NotesTooLong { length, max } => {
                write!(f, "Notes too long: {length} characters, max {max}")
            }
            Self::TrainingCanceled => write!(f, "Training is canceled"),
            Self::TrainingAlreadyCanceled => write!(f, "Training is already canceled"),
            Self::CantRescheduleBeforeTime { training_time } => write!(
                f,
                "Can't reschedule training at {training_time}: less than 24h before the training"
            ),
            Self::NoRescheduleRequested => write!(f, "No training reschedule was requested yet"),
            Self::SameUserTypeApproval { user_type } => write!(
                f,
                "Cannot approve reschedule by the same user type that proposed it: {}",
                user_type.as_str()
            ),
            Self::InvalidUserType(value) => write!(f, "Invalid user type: {value}"),
            Self::MissingUserField(field) => write!(f, "Empty user {field}"),
            Self::ForbiddenToSeeTraining {
                user_uuid,
                owner_uuid,
            } => write!(
                f,
                "User '{user_uuid}' can't see training of user '{owner_uuid}'"
            ),
            Self::InsufficientBalance {
                user_uuid,
                balance,
                amount_change,
            } => write!(
                f,
                "Insufficient balance for user '{user_uuid}': balance {balance}, change {amount_change}"
            ),
            Self::InvalidDateRange { from, to } => {
                write!(f, "Date from ({from}) is after date to ({to})")
            }
        }
    }
}

impl std::error::Error for DomainError {}

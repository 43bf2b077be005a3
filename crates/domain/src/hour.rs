// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trainer hours.
//!
//! An hour is a single bookable slot on the trainer's calendar. Its
//! availability moves through a small state machine:
//!
//! ```text
//! NotAvailable --make_available--> Available --schedule_training--> TrainingScheduled
//!      ^                              |  ^                                   |
//!      +------make_not_available------+  +---------cancel_training-----------+
//! ```
//!
//! Every other (state, transition) pair is rejected and leaves the hour
//! untouched. New hours are only created through [`HourFactory`], which
//! enforces the scheduling window; rows read back from storage are trusted
//! and bypass that validation.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime, Time, UtcOffset};

/// Availability state of a trainer hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The trainer is free and accepts bookings.
    Available,
    /// The trainer does not accept bookings.
    NotAvailable,
    /// A training is booked in this hour.
    TrainingScheduled,
}

impl Availability {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NotAvailable => "not_available",
            Self::TrainingScheduled => "training_scheduled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "available" => Ok(Self::Available),
            "not_available" => Ok(Self::NotAvailable),
            "training_scheduled" => Ok(Self::TrainingScheduled),
            _ => Err(DomainError::InvalidAvailability(s.to_string())),
        }
    }
}

impl FromStr for Availability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trainer hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hour {
    time: OffsetDateTime,
    availability: Availability,
}

impl Hour {
    /// Returns the start of the hour.
    #[must_use]
    pub const fn time(&self) -> OffsetDateTime {
        self.time
    }

    /// Returns the current availability.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Returns true if the hour accepts bookings.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self.availability, Availability::Available)
    }

    /// Returns true if a training is booked in this hour.
    #[must_use]
    pub const fn has_training_scheduled(&self) -> bool {
        matches!(self.availability, Availability::TrainingScheduled)
    }

    /// Opens the hour for bookings.
    ///
    /// # Errors
    ///
    /// Fails if a training is scheduled or the hour is already available.
    pub const fn make_available(&mut self) -> Result<(), DomainError> {
        match self.availability {
            Availability::NotAvailable => {
                self.availability = Availability::Available;
                Ok(())
            }
            Availability::Available => Err(DomainError::HourAlreadyAvailable),
            Availability::TrainingScheduled => Err(DomainError::TrainingScheduled),
        }
    }

    /// Closes the hour for bookings.
    ///
    /// # Errors
    ///
    /// Fails if a training is scheduled or the hour is already not available.
    pub const fn make_not_available(&mut self) -> Result<(), DomainError> {
        match self.availability {
            Availability::Available => {
                self.availability = Availability::NotAvailable;
                Ok(())
            }
            Availability::NotAvailable => Err(DomainError::HourAlreadyNotAvailable),
            Availability::TrainingScheduled => Err(DomainError::TrainingScheduled),
        }
    }

    /// Books a training into this hour.
    ///
    /// # Errors
    ///
    /// Fails with `HourNotAvailable` unless the hour is available.
    pub const fn schedule_training(&mut self) -> Result<(), DomainError> {
        if !self.is_available() {
            return Err(DomainError::HourNotAvailable);
        }
        self.availability = Availability::TrainingScheduled;
        Ok(())
    }

    /// Releases the booked training; the hour becomes available again.
    ///
    /// # Errors
    ///
    /// Fails with `NoTrainingScheduled` unless a training is booked.
    pub const fn cancel_training(&mut self) -> Result<(), DomainError> {
        if !self.has_training_scheduled() {
            return Err(DomainError::NoTrainingScheduled);
        }
        self.availability = Availability::Available;
        Ok(())
    }
}

/// Limits applied when creating new hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// How far ahead the calendar may be edited.
    pub max_weeks_in_the_future_to_set: u8,
    /// Earliest UTC hour of the day that may be created.
    pub min_utc_hour: u8,
    /// Latest UTC hour of the day that may be created.
    pub max_utc_hour: u8,
}

impl FactoryConfig {
    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFactoryConfig` listing every violated rule.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems: Vec<String> = Vec::new();

        if self.max_weeks_in_the_future_to_set < 1 {
            problems.push(format!(
                "max_weeks_in_the_future_to_set should be greater than 1, but is {}",
                self.max_weeks_in_the_future_to_set
            ));
        }
        if self.min_utc_hour > 24 {
            problems.push(format!(
                "min_utc_hour should be value between 0 and 24, but is {}",
                self.min_utc_hour
            ));
        }
        if self.max_utc_hour > 24 {
            problems.push(format!(
                "max_utc_hour should be value between 0 and 24, but is {}",
                self.max_utc_hour
            ));
        }
        if self.min_utc_hour > self.max_utc_hour {
            problems.push(format!(
                "max_utc_hour ({}) can't be before min_utc_hour ({})",
                self.max_utc_hour, self.min_utc_hour
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidFactoryConfig(problems.join(", ")))
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_weeks_in_the_future_to_set: 6,
            min_utc_hour: 12,
            max_utc_hour: 20,
        }
    }
}

/// Creates validated hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourFactory {
    config: FactoryConfig,
}

impl HourFactory {
    /// Creates a factory from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent.
    pub fn new(config: FactoryConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the factory configuration.
    #[must_use]
    pub const fn config(&self) -> FactoryConfig {
        self.config
    }

    /// Creates a new available hour.
    ///
    /// # Arguments
    ///
    /// * `time` - Start of the hour
    /// * `now` - The current instant, used for the window checks
    ///
    /// # Errors
    ///
    /// Returns an error if `time` falls outside the allowed window.
    pub fn new_available_hour(
        &self,
        time: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Hour, DomainError> {
        self.validate_time(time, now)?;
        Ok(Hour {
            time,
            availability: Availability::Available,
        })
    }

    /// Creates a new hour that does not accept bookings.
    ///
    /// This is how hours that were never touched come into existence.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` falls outside the allowed window.
    pub fn new_not_available_hour(
        &self,
        time: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Hour, DomainError> {
        self.validate_time(time, now)?;
        Ok(Hour {
            time,
            availability: Availability::NotAvailable,
        })
    }

    /// Rebuilds an hour from storage.
    ///
    /// Stored rows were validated when they were created, so neither the
    /// window nor the day band is re-checked here. Hours that have drifted
    /// into the past must still load.
    #[must_use]
    pub const fn unmarshal_hour_from_database(
        &self,
        time: OffsetDateTime,
        availability: Availability,
    ) -> Hour {
        Hour { time, availability }
    }

    fn validate_time(&self, time: OffsetDateTime, now: OffsetDateTime) -> Result<(), DomainError> {
        let time = time.to_offset(UtcOffset::UTC);
        let now = now.to_offset(UtcOffset::UTC);

        if time.minute() != 0 || time.second() != 0 || time.nanosecond() != 0 {
            return Err(DomainError::NotFullHour { hour: time });
        }

        let max_weeks = self.config.max_weeks_in_the_future_to_set;
        if time > now + Duration::weeks(i64::from(max_weeks)) {
            return Err(DomainError::TooDistantDate {
                max_weeks,
                hour: time,
            });
        }

        if time <= truncate_to_hour(now) {
            return Err(DomainError::PastHour { hour: time });
        }

        if time.hour() > self.config.max_utc_hour {
            return Err(DomainError::TooLateHour {
                max_utc_hour: self.config.max_utc_hour,
                hour: time,
            });
        }
        if time.hour() < self.config.min_utc_hour {
            return Err(DomainError::TooEarlyHour {
                min_utc_hour: self.config.min_utc_hour,
                hour: time,
            });
        }

        Ok(())
    }
}

fn truncate_to_hour(t: OffsetDateTime) -> OffsetDateTime {
    t.replace_time(Time::MIDNIGHT + Duration::hours(i64::from(t.hour())))
}

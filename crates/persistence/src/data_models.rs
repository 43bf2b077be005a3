// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain objects.
//!
//! Times are stored as unix seconds in UTC.

use diesel::prelude::*;
use gymhours_domain::{
    Availability, Hour, HourFactory, RescheduleProposal, Training, UserAccount, UserType,
};
use time::OffsetDateTime;

use crate::diesel_schema::{trainer_hours, trainings, users};
use crate::error::PersistenceError;

/// A stored trainer hour.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = trainer_hours)]
pub struct HourRow {
    pub hour_id: i64,
    pub hour_time: i64,
    pub availability: String,
}

/// A stored training.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = trainings)]
pub struct TrainingRow {
    pub training_id: String,
    pub user_id: String,
    pub user_name: String,
    pub training_time: i64,
    pub notes: String,
    pub proposed_new_time: Option<i64>,
    pub move_proposed_by: Option<String>,
    pub canceled: i32,
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub user_id: String,
    pub user_type: String,
    pub display_name: String,
    pub balance: i64,
    pub last_ip: Option<String>,
}

pub fn to_timestamp(time: OffsetDateTime) -> i64 {
    time.unix_timestamp()
}

/// # Errors
///
/// Returns an error if `seconds` is outside the representable range.
pub fn from_timestamp(seconds: i64) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| PersistenceError::CorruptedRow(format!("timestamp {seconds}: {e}")))
}

fn parse_user_type(value: &str) -> Result<UserType, PersistenceError> {
    value
        .parse()
        .map_err(|e| PersistenceError::CorruptedRow(format!("user type '{value}': {e}")))
}

impl HourRow {
    /// Rebuilds the domain hour without re-validating its time.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored time or availability is not valid.
    pub fn into_domain(self, factory: &HourFactory) -> Result<Hour, PersistenceError> {
        let time = from_timestamp(self.hour_time)?;
        let availability: Availability = self.availability.parse().map_err(|e| {
            PersistenceError::CorruptedRow(format!("availability '{}': {e}", self.availability))
        })?;
        Ok(factory.unmarshal_hour_from_database(time, availability))
    }
}

impl TrainingRow {
    /// # Errors
    ///
    /// Returns an error if a stored time or role is not valid.
    pub fn into_domain(self) -> Result<Training, PersistenceError> {
        let proposal = match (self.proposed_new_time, self.move_proposed_by.as_deref()) {
            (Some(new_time), Some(proposed_by)) => Some(RescheduleProposal {
                new_time: from_timestamp(new_time)?,
                proposed_by: parse_user_type(proposed_by)?,
            }),
            (None, None) => None,
            _ => {
                return Err(PersistenceError::CorruptedRow(format!(
                    "training '{}' has a partial reschedule proposal",
                    self.training_id
                )));
            }
        };

        Ok(Training::unmarshal_from_database(
            self.training_id,
            self.user_id,
            self.user_name,
            from_timestamp(self.training_time)?,
            self.notes,
            self.canceled != 0,
            proposal,
        ))
    }

    #[must_use]
    pub fn from_domain(training: &Training) -> Self {
        let proposal = training.proposed_reschedule();
        Self {
            training_id: training.uuid().to_string(),
            user_id: training.user_uuid().to_string(),
            user_name: training.user_name().to_string(),
            training_time: to_timestamp(training.time()),
            notes: training.notes().to_string(),
            proposed_new_time: proposal.map(|p| to_timestamp(p.new_time)),
            move_proposed_by: proposal.map(|p| p.proposed_by.as_str().to_string()),
            canceled: i32::from(training.is_canceled()),
        }
    }
}

impl UserRow {
    /// # Errors
    ///
    /// Returns an error if the stored role is not valid.
    pub fn into_domain(self) -> Result<UserAccount, PersistenceError> {
        Ok(UserAccount::unmarshal_from_database(
            self.user_id,
            parse_user_type(&self.user_type)?,
            self.display_name,
            self.balance,
            self.last_ip,
        ))
    }

    #[must_use]
    pub fn from_domain(account: &UserAccount) -> Self {
        Self {
            user_id: account.uuid().to_string(),
            user_type: account.user_type().as_str().to_string(),
            display_name: account.display_name().to_string(),
            balance: account.balance(),
            last_ip: account.last_ip().map(str::to_string),
        }
    }
}

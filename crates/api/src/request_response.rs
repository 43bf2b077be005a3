// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps cross the boundary as RFC 3339 strings and dates as
//! `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

/// Query parameters of the trainer calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailableHoursRequest {
    /// First instant of the range (RFC 3339).
    pub date_from: String,
    /// Last instant of the range (RFC 3339).
    pub date_to: String,
}

/// Query parameters of a single hour lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HourAvailabilityRequest {
    /// Start of the hour (RFC 3339).
    pub hour: String,
}

/// Whether one hour can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourAvailabilityResponse {
    /// Start of the hour (RFC 3339).
    pub hour: String,
    pub available: bool,
}

/// One calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateResponse {
    /// The UTC date.
    pub date: String,
    /// True if at least one hour of the day can still be booked.
    pub has_free_hours: bool,
    /// Stored hours of the day, earliest first.
    pub hours: Vec<HourResponse>,
}

/// One calendar hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourResponse {
    /// Start of the hour (RFC 3339).
    pub hour: String,
    pub available: bool,
    pub has_training_scheduled: bool,
}

/// Hours to open or close.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HourUpdateRequest {
    /// Start of each hour (RFC 3339).
    pub hours: Vec<String>,
}

/// A new booking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostTrainingRequest {
    /// Start of the booked hour (RFC 3339).
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

/// Response for a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTrainingResponse {
    /// Identifier of the created training.
    pub training_uuid: String,
}

/// A new time for a training, applied directly or proposed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RescheduleTrainingRequest {
    /// The new start (RFC 3339).
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

/// A training as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub uuid: String,
    /// Display name of the attendee.
    pub user: String,
    pub user_uuid: String,
    /// Start (RFC 3339).
    pub time: String,
    pub notes: String,
    pub canceled: bool,
    /// True while the training can be canceled or moved without penalty.
    pub can_be_cancelled: bool,
    /// True if a reschedule proposal waits for the other side.
    pub move_requires_accept: bool,
    /// Proposed start (RFC 3339), if any.
    pub proposed_time: Option<String>,
    /// Role of the proposer, if any.
    pub move_proposed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingsResponse {
    pub trainings: Vec<TrainingResponse>,
}

/// An account to create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    /// Identifier of the user. Generated when absent.
    #[serde(default)]
    pub user_uuid: Option<String>,
    /// `trainer` or `attendee`.
    pub role: String,
    pub display_name: String,
    #[serde(default)]
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user_uuid: String,
}

/// A change of a user's training balance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTrainingBalanceRequest {
    /// Credits to add; negative to withdraw.
    pub amount_change: i64,
}

/// The caller's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub uuid: String,
    pub display_name: String,
    pub role: String,
    pub balance: i64,
}

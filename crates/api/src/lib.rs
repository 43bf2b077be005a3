// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the trainer hours and trainings scheduler.
//!
//! This crate sits between a transport and the applications in `gymhours`:
//! it authenticates callers from supplied identity, enforces role checks,
//! converts DTOs into commands and queries, and translates application
//! errors into a stable contract. It knows nothing about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthorizationService, authenticate_stub};
pub use error::{ApiError, AuthError, translate_app_error};
pub use handlers::{
    approve_training_reschedule, cancel_training, create_training, create_user, get_current_user,
    get_hour_availability, get_trainer_available_hours, get_trainings, make_hours_available,
    make_hours_unavailable,
    reject_training_reschedule, request_training_reschedule, reschedule_training,
    training_response, update_training_balance,
};
pub use request_response::{
    AvailableHoursRequest, CreateUserRequest, CreateUserResponse, CurrentUserResponse,
    DateResponse, HourAvailabilityRequest, HourAvailabilityResponse, HourResponse,
    HourUpdateRequest, PostTrainingRequest, PostTrainingResponse, RescheduleTrainingRequest,
    TrainingResponse, TrainingsResponse, UpdateTrainingBalanceRequest,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations over the three applications.
//!
//! Each function checks the caller's role, converts the request into a
//! command or query, runs it and translates the outcome into the API
//! contract. Handlers are synchronous; transports run them on blocking
//! threads.

use gymhours::trainer::{
    AvailableHours, Date, HourAvailability, MakeHoursAvailable, MakeHoursUnavailable,
};
use gymhours::trainings::{
    AllTrainings, ApproveTrainingReschedule, CancelTraining, RejectTrainingReschedule,
    RequestTrainingReschedule, RescheduleTraining, ScheduleTraining, TrainingsForUser,
};
use gymhours::users::{CreateUser, CurrentUser, UpdateLastIp, UpdateTrainingBalance};
use gymhours::{Applications, CommandHandler, QueryHandler};
use gymhours_domain::{Training, User, UserType};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::AuthorizationService;
use crate::error::ApiError;
use crate::request_response::{
    AvailableHoursRequest, CreateUserRequest, CreateUserResponse, CurrentUserResponse,
    DateResponse, HourAvailabilityRequest, HourAvailabilityResponse, HourResponse,
    HourUpdateRequest, PostTrainingRequest, PostTrainingResponse, RescheduleTrainingRequest,
    TrainingResponse, TrainingsResponse, UpdateTrainingBalanceRequest,
};

fn parse_time(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("'{value}' is not an RFC 3339 timestamp: {e}"),
    })
}

fn format_time(time: OffsetDateTime) -> Result<String, ApiError> {
    time.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn parse_hours(hours: &[String]) -> Result<Vec<OffsetDateTime>, ApiError> {
    hours.iter().map(|hour| parse_time("hours", hour)).collect()
}

fn date_response(date: Date) -> Result<DateResponse, ApiError> {
    let hours = date
        .hours
        .into_iter()
        .map(|hour| {
            Ok(HourResponse {
                hour: format_time(hour.hour)?,
                available: hour.available,
                has_training_scheduled: hour.has_training_scheduled,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(DateResponse {
        date: date.date.to_string(),
        has_free_hours: date.has_free_hours,
        hours,
    })
}

/// Converts a training into its response shape as seen at `now`.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be formatted.
pub fn training_response(
    training: &Training,
    now: OffsetDateTime,
) -> Result<TrainingResponse, ApiError> {
    Ok(TrainingResponse {
        uuid: training.uuid().to_string(),
        user: training.user_name().to_string(),
        user_uuid: training.user_uuid().to_string(),
        time: format_time(training.time())?,
        notes: training.notes().to_string(),
        canceled: training.is_canceled(),
        can_be_cancelled: !training.is_canceled() && training.can_be_canceled_for_free(now),
        move_requires_accept: training.is_reschedule_proposed(),
        proposed_time: training.proposed_new_time().map(format_time).transpose()?,
        move_proposed_by: training.move_proposed_by().map(|role| role.to_string()),
    })
}

/// Returns the trainer's calendar for a range, grouped by UTC date.
///
/// Any authenticated user may read the calendar.
///
/// # Errors
///
/// Returns an error if a bound is malformed or the range is inverted.
pub fn get_trainer_available_hours(
    apps: &Applications,
    request: &AvailableHoursRequest,
) -> Result<Vec<DateResponse>, ApiError> {
    let from = parse_time("date_from", &request.date_from)?;
    let to = parse_time("date_to", &request.date_to)?;

    let dates = apps
        .trainer
        .queries
        .available_hours
        .handle(AvailableHours { from, to })?;

    dates.into_iter().map(date_response).collect()
}

/// Reports whether a single hour can be booked right now.
///
/// Hours that were never opened are not available.
///
/// # Errors
///
/// Returns an error if the hour is malformed or the store fails.
pub fn get_hour_availability(
    apps: &Applications,
    request: &HourAvailabilityRequest,
) -> Result<HourAvailabilityResponse, ApiError> {
    let hour = parse_time("hour", &request.hour)?;

    let available = apps
        .trainer
        .queries
        .hour_availability
        .handle(HourAvailability { hour })?;

    Ok(HourAvailabilityResponse {
        hour: format_time(hour)?,
        available,
    })
}

/// Opens hours for booking.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a trainer
/// - An hour is malformed or violates the calendar rules
/// - An hour is already available or booked
pub fn make_hours_available(
    apps: &Applications,
    user: &User,
    request: &HourUpdateRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_trainer(user, "make_hours_available")?;
    let hours = parse_hours(&request.hours)?;
    let count = hours.len();

    apps.trainer
        .commands
        .make_hours_available
        .handle(MakeHoursAvailable { hours })?;

    info!(trainer = user.uuid(), count, "Hours made available");
    Ok(())
}

/// Closes hours for booking.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a trainer
/// - An hour is malformed
/// - An hour is already closed or has a training
pub fn make_hours_unavailable(
    apps: &Applications,
    user: &User,
    request: &HourUpdateRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_trainer(user, "make_hours_unavailable")?;
    let hours = parse_hours(&request.hours)?;
    let count = hours.len();

    apps.trainer
        .commands
        .make_hours_unavailable
        .handle(MakeHoursUnavailable { hours })?;

    info!(trainer = user.uuid(), count, "Hours made unavailable");
    Ok(())
}

/// Lists trainings visible to the caller.
///
/// Trainers see every training; attendees see their own active ones.
///
/// # Errors
///
/// Returns an error if the trainings cannot be read.
pub fn get_trainings(
    apps: &Applications,
    user: &User,
    now: OffsetDateTime,
) -> Result<TrainingsResponse, ApiError> {
    let queries = &apps.trainings.queries;
    let trainings = match user.user_type() {
        UserType::Trainer => queries.all_trainings.handle(AllTrainings)?,
        UserType::Attendee => queries
            .trainings_for_user
            .handle(TrainingsForUser { user: user.clone() })?,
    };

    let trainings = trainings
        .iter()
        .map(|training| training_response(training, now))
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(TrainingsResponse { trainings })
}

/// Books a training for the calling attendee.
///
/// The training id is generated here.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an attendee
/// - The time is malformed or the notes are too long
/// - The balance is insufficient or the hour is not available
pub fn create_training(
    apps: &Applications,
    user: &User,
    request: &PostTrainingRequest,
) -> Result<PostTrainingResponse, ApiError> {
    AuthorizationService::authorize_attendee(user, "create_training")?;
    let training_time = parse_time("time", &request.time)?;
    let training_uuid = Uuid::new_v4().to_string();

    apps.trainings
        .commands
        .schedule_training
        .handle(ScheduleTraining {
            training_uuid: training_uuid.clone(),
            user_uuid: user.uuid().to_string(),
            user_name: user.display_name().to_string(),
            training_time,
            notes: request.notes.clone(),
        })?;

    info!(training_uuid, user_uuid = user.uuid(), "Training created");
    Ok(PostTrainingResponse { training_uuid })
}

/// Cancels a training on behalf of either side.
///
/// # Errors
///
/// Returns an error if the training is unknown, not visible to the caller,
/// or already canceled.
pub fn cancel_training(
    apps: &Applications,
    user: &User,
    training_uuid: &str,
) -> Result<(), ApiError> {
    apps.trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: training_uuid.to_string(),
            user: user.clone(),
        })?;

    info!(training_uuid, user_uuid = user.uuid(), "Training canceled");
    Ok(())
}

/// Moves a training directly, while it can still be moved for free.
///
/// # Errors
///
/// Returns an error if the time is malformed, it is too late to move the
/// training, or the new hour is not available.
pub fn reschedule_training(
    apps: &Applications,
    user: &User,
    training_uuid: &str,
    request: &RescheduleTrainingRequest,
) -> Result<(), ApiError> {
    let new_time = parse_time("time", &request.time)?;

    apps.trainings
        .commands
        .reschedule_training
        .handle(RescheduleTraining {
            training_uuid: training_uuid.to_string(),
            new_time,
            new_notes: request.notes.clone(),
            user: user.clone(),
        })?;

    info!(training_uuid, user_uuid = user.uuid(), "Training rescheduled");
    Ok(())
}

/// Proposes a new time for the other side to approve.
///
/// # Errors
///
/// Returns an error if the time is malformed or the training cannot be
/// changed by the caller.
pub fn request_training_reschedule(
    apps: &Applications,
    user: &User,
    training_uuid: &str,
    request: &RescheduleTrainingRequest,
) -> Result<(), ApiError> {
    let new_time = parse_time("time", &request.time)?;

    apps.trainings
        .commands
        .request_training_reschedule
        .handle(RequestTrainingReschedule {
            training_uuid: training_uuid.to_string(),
            new_time,
            new_notes: request.notes.clone(),
            user: user.clone(),
        })?;

    debug!(training_uuid, user_uuid = user.uuid(), "Reschedule requested");
    Ok(())
}

/// Accepts a pending proposal made by the other side.
///
/// # Errors
///
/// Returns an error if nothing is pending, the caller made the proposal,
/// or the proposed hour cannot be booked.
pub fn approve_training_reschedule(
    apps: &Applications,
    user: &User,
    training_uuid: &str,
) -> Result<(), ApiError> {
    apps.trainings
        .commands
        .approve_training_reschedule
        .handle(ApproveTrainingReschedule {
            training_uuid: training_uuid.to_string(),
            user: user.clone(),
        })?;

    info!(training_uuid, user_uuid = user.uuid(), "Reschedule approved");
    Ok(())
}

/// Drops a pending proposal.
///
/// # Errors
///
/// Returns an error if nothing is pending or the training is not visible
/// to the caller.
pub fn reject_training_reschedule(
    apps: &Applications,
    user: &User,
    training_uuid: &str,
) -> Result<(), ApiError> {
    apps.trainings
        .commands
        .reject_training_reschedule
        .handle(RejectTrainingReschedule {
            training_uuid: training_uuid.to_string(),
            user: user.clone(),
        })?;

    debug!(training_uuid, user_uuid = user.uuid(), "Reschedule rejected");
    Ok(())
}

/// Returns the caller's account, recording the address it called from.
///
/// # Errors
///
/// Returns an error if the caller has no account.
pub fn get_current_user(
    apps: &Applications,
    user: &User,
    remote_ip: Option<&str>,
) -> Result<CurrentUserResponse, ApiError> {
    if let Some(ip) = remote_ip {
        apps.users.commands.update_last_ip.handle(UpdateLastIp {
            user_uuid: user.uuid().to_string(),
            ip: ip.to_string(),
        })?;
    }

    let account = apps.users.queries.current_user.handle(CurrentUser {
        user_uuid: user.uuid().to_string(),
    })?;

    Ok(CurrentUserResponse {
        uuid: account.uuid().to_string(),
        display_name: user.display_name().to_string(),
        role: user.user_type().to_string(),
        balance: account.balance(),
    })
}

/// Creates an account.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a trainer
/// - The role is unknown or a field is empty
/// - The id is taken
pub fn create_user(
    apps: &Applications,
    user: &User,
    request: &CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    AuthorizationService::authorize_trainer(user, "create_user")?;
    let user_type: UserType = request.role.parse().map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!("Unknown role '{}'", request.role),
    })?;
    let user_uuid = request
        .user_uuid
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    apps.users.commands.create_user.handle(CreateUser {
        user_uuid: user_uuid.clone(),
        user_type,
        display_name: request.display_name.clone(),
        balance: request.balance,
    })?;

    info!(user_uuid, user_type = %user_type, "User created");
    Ok(CreateUserResponse { user_uuid })
}

/// Adds credits to, or withdraws them from, a user's balance.
///
/// # Errors
///
/// Returns an error if the caller is not a trainer, the user is unknown,
/// or the balance would go negative.
pub fn update_training_balance(
    apps: &Applications,
    user: &User,
    user_uuid: &str,
    request: &UpdateTrainingBalanceRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_trainer(user, "update_training_balance")?;

    apps.users
        .commands
        .update_training_balance
        .handle(UpdateTrainingBalance {
            user_uuid: user_uuid.to_string(),
            amount_change: request.amount_change,
        })?;

    info!(
        user_uuid,
        amount_change = request.amount_change,
        "Training balance updated"
    );
    Ok(())
}

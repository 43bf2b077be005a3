// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decorator::CommandHandler;
use crate::error::{AppError, ResultExt};
use crate::ports::HourRepository;
use gymhours_domain::{DomainError, Hour};
use std::sync::Arc;
use time::OffsetDateTime;

/// Books the hour for a training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTraining {
    pub hour: OffsetDateTime,
}

/// Releases a booked hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelTraining {
    pub hour: OffsetDateTime,
}

/// Opens hours for bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeHoursAvailable {
    pub hours: Vec<OffsetDateTime>,
}

/// Closes hours for bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeHoursUnavailable {
    pub hours: Vec<OffsetDateTime>,
}

fn transition(
    step: fn(&mut Hour) -> Result<(), DomainError>,
) -> impl Fn(Hour) -> Result<Hour, AppError> {
    move |mut hour| {
        step(&mut hour)?;
        Ok(hour)
    }
}

pub struct ScheduleTrainingHandler {
    hours: Arc<dyn HourRepository>,
}

impl ScheduleTrainingHandler {
    pub fn new(hours: Arc<dyn HourRepository>) -> Self {
        Self { hours }
    }
}

impl CommandHandler<ScheduleTraining> for ScheduleTrainingHandler {
    fn handle(&self, command: ScheduleTraining) -> Result<(), AppError> {
        self.hours
            .update_hour(command.hour, &transition(Hour::schedule_training))
            .context("schedule-training-failed", "unable to schedule training")?;
        Ok(())
    }
}

pub struct CancelTrainingHandler {
    hours: Arc<dyn HourRepository>,
}

impl CancelTrainingHandler {
    pub fn new(hours: Arc<dyn HourRepository>) -> Self {
        Self { hours }
    }
}

impl CommandHandler<CancelTraining> for CancelTrainingHandler {
    fn handle(&self, command: CancelTraining) -> Result<(), AppError> {
        self.hours
            .update_hour(command.hour, &transition(Hour::cancel_training))
            .context("cancel-training-failed", "unable to cancel training")?;
        Ok(())
    }
}

/// Each hour is updated in its own transaction; hours before the first
/// failure stay updated.
pub struct MakeHoursAvailableHandler {
    hours: Arc<dyn HourRepository>,
}

impl MakeHoursAvailableHandler {
    pub fn new(hours: Arc<dyn HourRepository>) -> Self {
        Self { hours }
    }
}

impl CommandHandler<MakeHoursAvailable> for MakeHoursAvailableHandler {
    fn handle(&self, command: MakeHoursAvailable) -> Result<(), AppError> {
        let make_available = transition(Hour::make_available);
        for hour in command.hours {
            self.hours
                .update_hour(hour, &make_available)
                .context(
                    "make-hours-available-failed",
                    &format!("unable to make hour {hour} available"),
                )?;
        }
        Ok(())
    }
}

pub struct MakeHoursUnavailableHandler {
    hours: Arc<dyn HourRepository>,
}

impl MakeHoursUnavailableHandler {
    pub fn new(hours: Arc<dyn HourRepository>) -> Self {
        Self { hours }
    }
}

impl CommandHandler<MakeHoursUnavailable> for MakeHoursUnavailableHandler {
    fn handle(&self, command: MakeHoursUnavailable) -> Result<(), AppError> {
        let make_not_available = transition(Hour::make_not_available);
        for hour in command.hours {
            self.hours
                .update_hour(hour, &make_not_available)
                .context(
                    "make-hours-unavailable-failed",
                    &format!("unable to make hour {hour} unavailable"),
                )?;
        }
        Ok(())
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Training commands.
//!
//! Workflows that touch another context run that step after the local
//! mutation has been validated. There is no distributed transaction: if a
//! later step fails, earlier steps in other contexts are not undone and the
//! error is reported to the caller.

use crate::clock::Clock;
use crate::decorator::CommandHandler;
use crate::error::{AppError, ResultExt};
use crate::ports::{TrainerService, TrainingRepository, UserService};
use gymhours_domain::{Training, User, cancel_balance_delta};
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTraining {
    pub training_uuid: String,
    pub user_uuid: String,
    pub user_name: String,
    pub training_time: OffsetDateTime,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTraining {
    pub training_uuid: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleTraining {
    pub training_uuid: String,
    pub new_time: OffsetDateTime,
    pub new_notes: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrainingReschedule {
    pub training_uuid: String,
    pub new_time: OffsetDateTime,
    pub new_notes: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveTrainingReschedule {
    pub training_uuid: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectTrainingReschedule {
    pub training_uuid: String,
    pub user: User,
}

/// Persists the training, charges one credit, then books the hour.
pub struct ScheduleTrainingHandler {
    trainings: Arc<dyn TrainingRepository>,
    users: Arc<dyn UserService>,
    trainer: Arc<dyn TrainerService>,
}

impl ScheduleTrainingHandler {
    pub fn new(
        trainings: Arc<dyn TrainingRepository>,
        users: Arc<dyn UserService>,
        trainer: Arc<dyn TrainerService>,
    ) -> Self {
        Self {
            trainings,
            users,
            trainer,
        }
    }
}

impl CommandHandler<ScheduleTraining> for ScheduleTrainingHandler {
    fn handle(&self, command: ScheduleTraining) -> Result<(), AppError> {
        let training = Training::new(
            &command.training_uuid,
            &command.user_uuid,
            &command.user_name,
            command.training_time,
            &command.notes,
        )
        .context("invalid-training-data", "invalid training data")?;

        self.trainings
            .add_training(&training)
            .context("add-training-failed", "unable to add training")?;

        self.users
            .update_training_balance(training.user_uuid(), -1)
            .context("update-balance-failed", "unable to change trainings balance")?;

        self.trainer
            .schedule_training(training.time())
            .context("schedule-training-failed", "unable to schedule training")?;

        Ok(())
    }
}

/// Cancels the training, settles the balance, then releases the hour.
pub struct CancelTrainingHandler {
    trainings: Arc<dyn TrainingRepository>,
    users: Arc<dyn UserService>,
    trainer: Arc<dyn TrainerService>,
    clock: Arc<dyn Clock>,
}

impl CancelTrainingHandler {
    pub fn new(
        trainings: Arc<dyn TrainingRepository>,
        users: Arc<dyn UserService>,
        trainer: Arc<dyn TrainerService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            trainings,
            users,
            trainer,
            clock,
        }
    }
}

impl CommandHandler<CancelTraining> for CancelTrainingHandler {
    fn handle(&self, command: CancelTraining) -> Result<(), AppError> {
        let now = self.clock.now();
        self.trainings
            .update_training(&command.training_uuid, &command.user, &|mut training| {
                training
                    .cancel()
                    .context("cancel-training-failed", "unable to cancel training")?;

                let delta = cancel_balance_delta(&training, command.user.user_type(), now);
                if delta != 0 {
                    self.users
                        .update_training_balance(training.user_uuid(), delta)
                        .context("update-balance-failed", "unable to change trainings balance")?;
                }

                self.trainer
                    .cancel_training(training.time())
                    .context("cancel-training-failed", "unable to cancel training")?;

                Ok(training)
            })?;
        Ok(())
    }
}

/// Moves the training directly; only allowed while it can be canceled for
/// free. The trainer calendar is updated before the training commits, so a
/// refused hour leaves the training untouched.
pub struct RescheduleTrainingHandler {
    trainings: Arc<dyn TrainingRepository>,
    trainer: Arc<dyn TrainerService>,
    clock: Arc<dyn Clock>,
}

impl RescheduleTrainingHandler {
    pub fn new(
        trainings: Arc<dyn TrainingRepository>,
        trainer: Arc<dyn TrainerService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            trainings,
            trainer,
            clock,
        }
    }
}

impl CommandHandler<RescheduleTraining> for RescheduleTrainingHandler {
    fn handle(&self, command: RescheduleTraining) -> Result<(), AppError> {
        let now = self.clock.now();
        self.trainings
            .update_training(&command.training_uuid, &command.user, &|mut training| {
                let original_time = training.time();

                training
                    .update_notes(&command.new_notes)
                    .context("update-notes-failed", "unable to update notes")?;

                training
                    .reschedule_training(command.new_time, now)
                    .context("reschedule-training-failed", "unable to reschedule training")?;

                self.trainer
                    .move_training(command.new_time, original_time)
                    .context("move-training-failed", "unable to move training")?;

                Ok(training)
            })?;
        Ok(())
    }
}

/// Records a reschedule proposal on behalf of the caller's role.
pub struct RequestTrainingRescheduleHandler {
    trainings: Arc<dyn TrainingRepository>,
}

impl RequestTrainingRescheduleHandler {
    pub fn new(trainings: Arc<dyn TrainingRepository>) -> Self {
        Self { trainings }
    }
}

impl CommandHandler<RequestTrainingReschedule> for RequestTrainingRescheduleHandler {
    fn handle(&self, command: RequestTrainingReschedule) -> Result<(), AppError> {
        self.trainings
            .update_training(&command.training_uuid, &command.user, &|mut training| {
                training
                    .update_notes(&command.new_notes)
                    .context("update-notes-failed", "unable to update notes")?;

                training
                    .propose_reschedule(command.new_time, command.user.user_type())
                    .context(
                        "request-reschedule-failed",
                        "unable to request training reschedule",
                    )?;

                Ok(training)
            })?;
        Ok(())
    }
}

/// Accepts the pending proposal and moves the booked hour.
pub struct ApproveTrainingRescheduleHandler {
    trainings: Arc<dyn TrainingRepository>,
    trainer: Arc<dyn TrainerService>,
}

impl ApproveTrainingRescheduleHandler {
    pub fn new(trainings: Arc<dyn TrainingRepository>, trainer: Arc<dyn TrainerService>) -> Self {
        Self { trainings, trainer }
    }
}

impl CommandHandler<ApproveTrainingReschedule> for ApproveTrainingRescheduleHandler {
    fn handle(&self, command: ApproveTrainingReschedule) -> Result<(), AppError> {
        self.trainings
            .update_training(&command.training_uuid, &command.user, &|mut training| {
                let original_time = training.time();

                training
                    .approve_reschedule(command.user.user_type())
                    .context(
                        "approve-reschedule-failed",
                        "unable to approve training reschedule",
                    )?;

                self.trainer
                    .move_training(training.time(), original_time)
                    .context("move-training-failed", "unable to move training")?;

                Ok(training)
            })?;
        Ok(())
    }
}

pub struct RejectTrainingRescheduleHandler {
    trainings: Arc<dyn TrainingRepository>,
}

impl RejectTrainingRescheduleHandler {
    pub fn new(trainings: Arc<dyn TrainingRepository>) -> Self {
        Self { trainings }
    }
}

impl CommandHandler<RejectTrainingReschedule> for RejectTrainingRescheduleHandler {
    fn handle(&self, command: RejectTrainingReschedule) -> Result<(), AppError> {
        self.trainings
            .update_training(&command.training_uuid, &command.user, &|mut training| {
                training.reject_reschedule().context(
                    "reject-reschedule-failed",
                    "unable to reject training reschedule",
                )?;
                Ok(training)
            })?;
        Ok(())
    }
}

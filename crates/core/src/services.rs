// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process adapters between contexts, and the composition root that
//! wires the three applications together.

use crate::clock::Clock;
use crate::decorator::Observability;
use crate::error::{AppError, ResultExt};
use crate::ports::{
    AvailableHoursReadModel, HourRepository, TrainerService, TrainingRepository,
    TrainingsReadModel, UserRepository, UserService,
};
use crate::trainer::{self, TrainerApplication};
use crate::trainings::{TrainingsApplication, TrainingsDependencies};
use crate::users::{UpdateTrainingBalance, UsersApplication};
use std::sync::Arc;
use time::OffsetDateTime;

/// Calls the trainer application directly.
pub struct LocalTrainerService {
    app: Arc<TrainerApplication>,
}

impl LocalTrainerService {
    pub const fn new(app: Arc<TrainerApplication>) -> Self {
        Self { app }
    }
}

impl TrainerService for LocalTrainerService {
    fn schedule_training(&self, time: OffsetDateTime) -> Result<(), AppError> {
        self.app
            .commands
            .schedule_training
            .handle(trainer::ScheduleTraining { hour: time })
    }

    fn cancel_training(&self, time: OffsetDateTime) -> Result<(), AppError> {
        self.app
            .commands
            .cancel_training
            .handle(trainer::CancelTraining { hour: time })
    }

    fn move_training(
        &self,
        new_time: OffsetDateTime,
        original_time: OffsetDateTime,
    ) -> Result<(), AppError> {
        self.schedule_training(new_time)
            .context("schedule-new-hour-failed", "unable to schedule training")?;
        self.cancel_training(original_time)
            .context("cancel-original-hour-failed", "unable to cancel training")
    }
}

/// Calls the users application directly.
pub struct LocalUserService {
    app: Arc<UsersApplication>,
}

impl LocalUserService {
    pub const fn new(app: Arc<UsersApplication>) -> Self {
        Self { app }
    }
}

impl UserService for LocalUserService {
    fn update_training_balance(
        &self,
        user_uuid: &str,
        amount_change: i64,
    ) -> Result<(), AppError> {
        self.app
            .commands
            .update_training_balance
            .handle(UpdateTrainingBalance {
                user_uuid: user_uuid.to_string(),
                amount_change,
            })
    }
}

/// Storage handles for all three contexts.
#[derive(Clone)]
pub struct Repositories {
    pub hours: Arc<dyn HourRepository>,
    pub available_hours: Arc<dyn AvailableHoursReadModel>,
    pub trainings: Arc<dyn TrainingRepository>,
    pub trainings_read_model: Arc<dyn TrainingsReadModel>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Uses one store for every port.
    pub fn from_store<S>(store: &Arc<S>) -> Self
    where
        S: HourRepository
            + AvailableHoursReadModel
            + TrainingRepository
            + TrainingsReadModel
            + UserRepository
            + 'static,
    {
        Self {
            hours: Arc::clone(store) as Arc<dyn HourRepository>,
            available_hours: Arc::clone(store) as Arc<dyn AvailableHoursReadModel>,
            trainings: Arc::clone(store) as Arc<dyn TrainingRepository>,
            trainings_read_model: Arc::clone(store) as Arc<dyn TrainingsReadModel>,
            users: Arc::clone(store) as Arc<dyn UserRepository>,
        }
    }
}

/// The three applications, wired through in-process services.
#[derive(Clone)]
pub struct Applications {
    pub trainer: Arc<TrainerApplication>,
    pub trainings: Arc<TrainingsApplication>,
    pub users: Arc<UsersApplication>,
}

impl Applications {
    pub fn new(
        repositories: &Repositories,
        clock: Arc<dyn Clock>,
        observability: &Observability,
    ) -> Self {
        let trainer = Arc::new(TrainerApplication::new(
            &repositories.hours,
            &repositories.available_hours,
            observability,
        ));
        let users = Arc::new(UsersApplication::new(&repositories.users, observability));
        let trainings = Arc::new(TrainingsApplication::new(
            &TrainingsDependencies {
                trainings: Arc::clone(&repositories.trainings),
                read_model: Arc::clone(&repositories.trainings_read_model),
                users: Arc::new(LocalUserService::new(Arc::clone(&users))),
                trainer: Arc::new(LocalTrainerService::new(Arc::clone(&trainer))),
                clock,
            },
            observability,
        ));

        Self {
            trainer,
            trainings,
            users,
        }
    }
}

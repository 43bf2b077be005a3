// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The trainings context: bookings and their reschedule negotiation.

mod commands;
mod queries;

pub use commands::{
    ApproveTrainingReschedule, ApproveTrainingRescheduleHandler, CancelTraining,
    CancelTrainingHandler, RejectTrainingReschedule, RejectTrainingRescheduleHandler,
    RequestTrainingReschedule, RequestTrainingRescheduleHandler, RescheduleTraining,
    RescheduleTrainingHandler, ScheduleTraining, ScheduleTrainingHandler,
};
pub use queries::{AllTrainings, AllTrainingsHandler, TrainingsForUser, TrainingsForUserHandler};

use crate::clock::Clock;
use crate::decorator::{
    CommandHandler, Observability, QueryHandler, apply_command_decorators, apply_query_decorators,
};
use crate::ports::{TrainerService, TrainingRepository, TrainingsReadModel, UserService};
use gymhours_domain::Training;
use std::sync::Arc;

pub struct TrainingsCommands {
    pub schedule_training: Box<dyn CommandHandler<ScheduleTraining>>,
    pub cancel_training: Box<dyn CommandHandler<CancelTraining>>,
    pub reschedule_training: Box<dyn CommandHandler<RescheduleTraining>>,
    pub request_training_reschedule: Box<dyn CommandHandler<RequestTrainingReschedule>>,
    pub approve_training_reschedule: Box<dyn CommandHandler<ApproveTrainingReschedule>>,
    pub reject_training_reschedule: Box<dyn CommandHandler<RejectTrainingReschedule>>,
}

pub struct TrainingsQueries {
    pub all_trainings: Box<dyn QueryHandler<AllTrainings, Vec<Training>>>,
    pub trainings_for_user: Box<dyn QueryHandler<TrainingsForUser, Vec<Training>>>,
}

/// Everything the trainings context depends on.
pub struct TrainingsDependencies {
    pub trainings: Arc<dyn TrainingRepository>,
    pub read_model: Arc<dyn TrainingsReadModel>,
    pub users: Arc<dyn UserService>,
    pub trainer: Arc<dyn TrainerService>,
    pub clock: Arc<dyn Clock>,
}

/// Every handler of the trainings context, decorated.
pub struct TrainingsApplication {
    pub commands: TrainingsCommands,
    pub queries: TrainingsQueries,
}

impl TrainingsApplication {
    pub fn new(deps: &TrainingsDependencies, observability: &Observability) -> Self {
        let trainings = &deps.trainings;
        Self {
            commands: TrainingsCommands {
                schedule_training: apply_command_decorators(
                    ScheduleTrainingHandler::new(
                        Arc::clone(trainings),
                        Arc::clone(&deps.users),
                        Arc::clone(&deps.trainer),
                    ),
                    "trainings.schedule_training",
                    observability,
                ),
                cancel_training: apply_command_decorators(
                    CancelTrainingHandler::new(
                        Arc::clone(trainings),
                        Arc::clone(&deps.users),
                        Arc::clone(&deps.trainer),
                        Arc::clone(&deps.clock),
                    ),
                    "trainings.cancel_training",
                    observability,
                ),
                reschedule_training: apply_command_decorators(
                    RescheduleTrainingHandler::new(
                        Arc::clone(trainings),
                        Arc::clone(&deps.trainer),
                        Arc::clone(&deps.clock),
                    ),
                    "trainings.reschedule_training",
                    observability,
                ),
                request_training_reschedule: apply_command_decorators(
                    RequestTrainingRescheduleHandler::new(Arc::clone(trainings)),
                    "trainings.request_training_reschedule",
                    observability,
                ),
                approve_training_reschedule: apply_command_decorators(
                    ApproveTrainingRescheduleHandler::new(
                        Arc::clone(trainings),
                        Arc::clone(&deps.trainer),
                    ),
                    "trainings.approve_training_reschedule",
                    observability,
                ),
                reject_training_reschedule: apply_command_decorators(
                    RejectTrainingRescheduleHandler::new(Arc::clone(trainings)),
                    "trainings.reject_training_reschedule",
                    observability,
                ),
            },
            queries: TrainingsQueries {
                all_trainings: apply_query_decorators(
                    AllTrainingsHandler::new(Arc::clone(&deps.read_model)),
                    "trainings.all_trainings",
                    observability,
                ),
                trainings_for_user: apply_query_decorators(
                    TrainingsForUserHandler::new(Arc::clone(&deps.read_model)),
                    "trainings.trainings_for_user",
                    observability,
                ),
            },
        }
    }
}

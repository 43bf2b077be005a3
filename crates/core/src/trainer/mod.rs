// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The trainer context: the calendar of bookable hours.

mod commands;
mod queries;

pub use commands::{
    CancelTraining, CancelTrainingHandler, MakeHoursAvailable, MakeHoursAvailableHandler,
    MakeHoursUnavailable, MakeHoursUnavailableHandler, ScheduleTraining, ScheduleTrainingHandler,
};
pub use queries::{
    AvailableHours, AvailableHoursHandler, Date, HourAvailability, HourAvailabilityHandler,
    HourView, group_by_date,
};

use crate::decorator::{
    CommandHandler, Observability, QueryHandler, apply_command_decorators, apply_query_decorators,
};
use crate::ports::{AvailableHoursReadModel, HourRepository};
use std::sync::Arc;

pub struct TrainerCommands {
    pub schedule_training: Box<dyn CommandHandler<ScheduleTraining>>,
    pub cancel_training: Box<dyn CommandHandler<CancelTraining>>,
    pub make_hours_available: Box<dyn CommandHandler<MakeHoursAvailable>>,
    pub make_hours_unavailable: Box<dyn CommandHandler<MakeHoursUnavailable>>,
}

pub struct TrainerQueries {
    pub available_hours: Box<dyn QueryHandler<AvailableHours, Vec<Date>>>,
    pub hour_availability: Box<dyn QueryHandler<HourAvailability, bool>>,
}

/// Every handler of the trainer context, decorated.
pub struct TrainerApplication {
    pub commands: TrainerCommands,
    pub queries: TrainerQueries,
}

impl TrainerApplication {
    pub fn new(
        hours: &Arc<dyn HourRepository>,
        read_model: &Arc<dyn AvailableHoursReadModel>,
        observability: &Observability,
    ) -> Self {
        Self {
            commands: TrainerCommands {
                schedule_training: apply_command_decorators(
                    ScheduleTrainingHandler::new(Arc::clone(hours)),
                    "trainer.schedule_training",
                    observability,
                ),
                cancel_training: apply_command_decorators(
                    CancelTrainingHandler::new(Arc::clone(hours)),
                    "trainer.cancel_training",
                    observability,
                ),
                make_hours_available: apply_command_decorators(
                    MakeHoursAvailableHandler::new(Arc::clone(hours)),
                    "trainer.make_hours_available",
                    observability,
                ),
                make_hours_unavailable: apply_command_decorators(
                    MakeHoursUnavailableHandler::new(Arc::clone(hours)),
                    "trainer.make_hours_unavailable",
                    observability,
                ),
            },
            queries: TrainerQueries {
                available_hours: apply_query_decorators(
                    AvailableHoursHandler::new(Arc::clone(read_model)),
                    "trainer.available_hours",
                    observability,
                ),
                hour_availability: apply_query_decorators(
                    HourAvailabilityHandler::new(Arc::clone(hours)),
                    "trainer.hour_availability",
                    observability,
                ),
            },
        }
    }
}

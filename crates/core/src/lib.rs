// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application layer: command and query handlers for the trainer, trainings
//! and users contexts, the ports they depend on, and in-memory adapters.
//!
//! Handlers are synchronous and thread-safe. Callers on an async runtime
//! should run them on a blocking pool.

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
#![allow(clippy::multiple_crate_versions, clippy::missing_errors_doc)]

mod clock;
mod decorator;
mod error;
pub mod memory;
mod ports;
mod services;
pub mod trainer;
pub mod trainings;
pub mod users;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use decorator::{
    CommandHandler, InMemoryMetrics, LoggingDecorator, MetricsClient, MetricsDecorator,
    NoOpMetrics, Observability, QueryHandler, apply_command_decorators, apply_query_decorators,
};
pub use error::{AppError, ResultExt, StorageError};
pub use ports::{
    AvailableHoursReadModel, HourRepository, HourTransition, TrainerService, TrainingRepository,
    TrainingTransition, TrainingsReadModel, UserRepository, UserService,
};
pub use services::{Applications, LocalTrainerService, LocalUserService, Repositories};

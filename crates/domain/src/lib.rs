// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain model for trainer hours and trainings.
//!
//! Everything here is pure: no I/O, no clocks. Operations that depend on the
//! current time take it as an argument.

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

mod error;
mod hour;
mod reschedule;
mod training;
mod user;

#[cfg(test)]
mod tests;

pub use error::{DomainError, ErrorKind};
pub use hour::{Availability, FactoryConfig, Hour, HourFactory};
pub use reschedule::RescheduleProposal;
pub use training::{
    FREE_CANCELLATION_WINDOW, MAX_NOTES_LENGTH, Training, cancel_balance_delta,
};
pub use user::{User, UserAccount, UserType, can_user_see_training};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error_mapping_tests;
mod user_repository_tests;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gymhours::{Clock, FixedClock};
use gymhours_domain::{FactoryConfig, HourFactory, User, UserType};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{Persistence, PersistenceOptions};

/// Monday 2025-11-24, 09:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-11-24 09:30 UTC);

/// A valid hour one week after [`NOW`].
pub const HOUR: OffsetDateTime = datetime!(2025-12-01 13:00 UTC);

pub const OTHER_HOUR: OffsetDateTime = datetime!(2025-12-01 15:00 UTC);

pub fn create_test_factory() -> HourFactory {
    HourFactory::new(FactoryConfig::default()).expect("default config is valid")
}

pub fn create_test_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

pub fn create_in_memory(clock: &Arc<FixedClock>) -> Persistence {
    Persistence::new_in_memory(
        create_test_factory(),
        Arc::clone(clock) as Arc<dyn Clock>,
        PersistenceOptions::default(),
    )
    .expect("in-memory stores initialize")
}

/// File-backed stores with room for many concurrent writers.
pub fn create_in_dir(dir: &Path, clock: &Arc<FixedClock>) -> Persistence {
    Persistence::new_with_dir(
        dir,
        create_test_factory(),
        Arc::clone(clock) as Arc<dyn Clock>,
        PersistenceOptions {
            pool_size: 8,
            lock_timeout: Duration::from_secs(30),
        },
    )
    .expect("file stores initialize")
}

pub fn trainer() -> User {
    User::new("trainer-1", UserType::Trainer, "Trainer").expect("valid user")
}

pub fn attendee(uuid: &str) -> User {
    User::new(uuid, UserType::Attendee, "Mariusz").expect("valid user")
}

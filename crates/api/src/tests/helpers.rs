// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;

use gymhours::memory::MemoryStore;
use gymhours::{Applications, Clock, FixedClock, Observability, Repositories};
use gymhours_domain::{FactoryConfig, HourFactory, User, UserType};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{CreateUserRequest, HourUpdateRequest, create_user, make_hours_available};

/// Monday 2025-11-24, 09:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-11-24 09:30 UTC);

pub const HOUR: &str = "2025-12-01T13:00:00Z";
pub const OTHER_HOUR: &str = "2025-12-01T15:00:00Z";

pub const ATTENDEE_UUID: &str = "attendee-1";

pub struct TestApi {
    pub apps: Applications,
    pub clock: Arc<FixedClock>,
}

pub fn create_test_api() -> TestApi {
    let clock = Arc::new(FixedClock::new(NOW));
    let factory = HourFactory::new(FactoryConfig::default()).expect("default config is valid");
    let store = Arc::new(MemoryStore::new(
        factory,
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let apps = Applications::new(
        &Repositories::from_store(&store),
        Arc::clone(&clock) as Arc<dyn Clock>,
        &Observability::disabled(),
    );
    TestApi { apps, clock }
}

pub fn create_test_trainer() -> User {
    User::new("trainer-1", UserType::Trainer, "Trainer").expect("valid user")
}

pub fn create_test_attendee() -> User {
    User::new(ATTENDEE_UUID, UserType::Attendee, "Mariusz").expect("valid user")
}

impl TestApi {
    pub fn clock_now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// An attendee with `balance` credits and both test hours open.
    pub fn with_open_calendar(self, balance: i64) -> Self {
        create_user(
            &self.apps,
            &create_test_trainer(),
            &CreateUserRequest {
                user_uuid: Some(ATTENDEE_UUID.to_string()),
                role: String::from("attendee"),
                display_name: String::from("Mariusz"),
                balance,
            },
        )
        .unwrap();
        make_hours_available(
            &self.apps,
            &create_test_trainer(),
            &HourUpdateRequest {
                hours: vec![HOUR.to_string(), OTHER_HOUR.to_string()],
            },
        )
        .unwrap();
        self
    }
}

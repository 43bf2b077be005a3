// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::memory::MemoryStore;
use crate::trainer::MakeHoursAvailable;
use crate::users::CreateUser;
use crate::{
    Applications, Clock, CommandHandler, FixedClock, InMemoryMetrics, Observability, Repositories,
};
use gymhours_domain::{FactoryConfig, HourFactory, User, UserType};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

/// Monday 2025-11-24, 09:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-11-24 09:30 UTC);

/// A valid hour one week after [`NOW`].
pub const HOUR: OffsetDateTime = datetime!(2025-12-01 13:00 UTC);

/// Another valid hour on the same day.
pub const OTHER_HOUR: OffsetDateTime = datetime!(2025-12-01 15:00 UTC);

pub const ATTENDEE_UUID: &str = "attendee-1";

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub metrics: Arc<InMemoryMetrics>,
    pub apps: Applications,
}

pub fn create_test_factory() -> HourFactory {
    HourFactory::new(FactoryConfig::default()).expect("default config is valid")
}

pub fn create_fixture() -> Fixture {
    let clock = Arc::new(FixedClock::new(NOW));
    let store = Arc::new(MemoryStore::new(
        create_test_factory(),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let metrics = Arc::new(InMemoryMetrics::new());
    let observability = Observability::new(
        tracing::info_span!("test"),
        Arc::clone(&metrics) as Arc<dyn crate::MetricsClient>,
    );
    let apps = Applications::new(
        &Repositories::from_store(&store),
        Arc::clone(&clock) as Arc<dyn Clock>,
        &observability,
    );
    Fixture {
        store,
        clock,
        metrics,
        apps,
    }
}

pub fn trainer() -> User {
    User::new("trainer-1", UserType::Trainer, "Trainer").expect("valid user")
}

pub fn attendee(uuid: &str) -> User {
    User::new(uuid, UserType::Attendee, "Mariusz").expect("valid user")
}

impl Fixture {
    pub fn create_attendee(&self, uuid: &str, balance: i64) {
        self.apps
            .users
            .commands
            .create_user
            .handle(CreateUser {
                user_uuid: uuid.to_string(),
                user_type: UserType::Attendee,
                display_name: String::from("Mariusz"),
                balance,
            })
            .expect("create attendee");
    }

    pub fn make_available(&self, hours: &[OffsetDateTime]) {
        self.apps
            .trainer
            .commands
            .make_hours_available
            .handle(MakeHoursAvailable {
                hours: hours.to_vec(),
            })
            .expect("make hours available");
    }

    pub fn availability(&self, hour: OffsetDateTime) -> Option<gymhours_domain::Availability> {
        use crate::HourRepository;
        self.store
            .get_hour(hour)
            .expect("read hour")
            .map(|h| h.availability())
    }

    pub fn balance(&self, uuid: &str) -> i64 {
        use crate::UserRepository;
        self.store.get_user(uuid).expect("read user").balance()
    }
}

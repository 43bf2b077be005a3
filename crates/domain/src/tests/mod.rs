// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::{FactoryConfig, Hour, HourFactory, Training};
use time::OffsetDateTime;
use time::macros::datetime;

/// The instant tests treat as "now": Monday 2025-11-24, 09:30 UTC.
pub const NOW: OffsetDateTime = datetime!(2025-11-24 09:30 UTC);

/// A valid bookable hour one week after [`NOW`].
pub const HOUR: OffsetDateTime = datetime!(2025-12-01 13:00 UTC);

pub fn create_test_factory() -> HourFactory {
    match HourFactory::new(FactoryConfig::default()) {
        Ok(factory) => factory,
        Err(e) => panic!("default factory config must be valid: {e}"),
    }
}

pub fn create_not_available_hour() -> Hour {
    match create_test_factory().new_not_available_hour(HOUR, NOW) {
        Ok(hour) => hour,
        Err(e) => panic!("test hour must be valid: {e}"),
    }
}

pub fn create_test_training() -> Training {
    match Training::new("training-1", "attendee-1", "Mariusz", HOUR, "") {
        Ok(training) => training,
        Err(e) => panic!("test training must be valid: {e}"),
    }
}

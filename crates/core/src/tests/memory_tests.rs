// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{ATTENDEE_UUID, HOUR, NOW, OTHER_HOUR, attendee, create_fixture, trainer};
use crate::{AvailableHoursReadModel, HourRepository, TrainingRepository, UserRepository};
use gymhours_domain::{Availability, DomainError, ErrorKind, Training, UserAccount, UserType};
use time::Duration;

fn sample_training(uuid: &str) -> Training {
    Training::new(uuid, ATTENDEE_UUID, "Mariusz", HOUR, "").unwrap()
}

#[test]
fn test_get_hour_does_not_create_rows() {
    let fixture = create_fixture();
    assert_eq!(fixture.store.get_hour(HOUR).unwrap(), None);
    assert!(fixture.store.hours.is_empty());
    assert!(
        fixture
            .store
            .hours_between(NOW, NOW + Duration::weeks(6))
            .unwrap()
            .is_empty()
    );
    assert_eq!(fixture.store.hours.slot_count(), 0);
}

#[test]
fn test_reads_of_untouched_hours_leave_no_slots() {
    let fixture = create_fixture();

    for offset in 0..1_000 {
        let time = HOUR + Duration::hours(offset);
        assert_eq!(fixture.store.get_hour(time).unwrap(), None);
    }

    assert_eq!(fixture.store.hours.slot_count(), 0);
}

#[test]
fn test_failed_update_writes_nothing() {
    let fixture = create_fixture();

    let err = fixture
        .store
        .update_hour(HOUR, &|_| Err(DomainError::HourNotAvailable.into()))
        .unwrap_err();

    assert_eq!(err.domain_error(), Some(&DomainError::HourNotAvailable));
    assert_eq!(fixture.store.get_hour(HOUR).unwrap(), None);
    assert!(fixture.store.hours.is_empty());
    assert_eq!(fixture.store.hours.slot_count(), 0);
}

#[test]
fn test_failed_update_keeps_written_hour() {
    let fixture = create_fixture();
    fixture.make_available(&[HOUR]);

    fixture
        .store
        .update_hour(HOUR, &|_| Err(DomainError::HourNotAvailable.into()))
        .unwrap_err();

    assert_eq!(fixture.store.hours.slot_count(), 1);
    assert!(fixture.store.get_hour(HOUR).unwrap().unwrap().is_available());
}

#[test]
fn test_update_of_missing_hour_starts_not_available() {
    let fixture = create_fixture();

    let hour = fixture
        .store
        .update_hour(HOUR, &|mut hour| {
            assert_eq!(hour.availability(), Availability::NotAvailable);
            hour.make_available()?;
            Ok(hour)
        })
        .unwrap();

    assert!(hour.is_available());
    assert_eq!(fixture.store.hours.len(), 1);
}

#[test]
fn test_update_of_missing_invalid_hour_is_rejected() {
    let fixture = create_fixture();
    let err = fixture
        .store
        .update_hour(HOUR + Duration::minutes(30), &|mut hour| {
            hour.make_available()?;
            Ok(hour)
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(fixture.store.hours.is_empty());
    assert_eq!(fixture.store.hours.slot_count(), 0);
}

#[test]
fn test_hours_between_is_inclusive_and_ordered() {
    let fixture = create_fixture();
    fixture.make_available(&[OTHER_HOUR, HOUR]);

    let hours = fixture.store.hours_between(HOUR, OTHER_HOUR).unwrap();
    let times: Vec<_> = hours.iter().map(gymhours_domain::Hour::time).collect();
    assert_eq!(times, vec![HOUR, OTHER_HOUR]);

    let hours = fixture
        .store
        .hours_between(HOUR + Duration::hours(1), OTHER_HOUR)
        .unwrap();
    assert_eq!(hours.len(), 1);
}

#[test]
fn test_training_visibility() {
    let fixture = create_fixture();
    fixture.store.add_training(&sample_training("t-1")).unwrap();

    assert!(fixture.store.get_training("t-1", &trainer()).is_ok());
    assert!(fixture.store.get_training("t-1", &attendee(ATTENDEE_UUID)).is_ok());

    let err = fixture
        .store
        .get_training("t-1", &attendee("someone-else"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = fixture.store.get_training("t-2", &trainer()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_forbidden_update_writes_nothing() {
    let fixture = create_fixture();
    fixture.store.add_training(&sample_training("t-1")).unwrap();

    let err = fixture
        .store
        .update_training("t-1", &attendee("someone-else"), &|mut training| {
            training.cancel()?;
            Ok(training)
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(
        !fixture
            .store
            .get_training("t-1", &trainer())
            .unwrap()
            .is_canceled()
    );
}

#[test]
fn test_duplicate_user_rejected() {
    let fixture = create_fixture();
    let account = UserAccount::new(ATTENDEE_UUID, UserType::Attendee, "Mariusz", 0).unwrap();
    fixture.store.add_user(&account).unwrap();
    let err = fixture.store.add_user(&account).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

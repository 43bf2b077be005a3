// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ATTENDEE_UUID, Fixture, HOUR, OTHER_HOUR, attendee, create_fixture, trainer,
};
use crate::trainings::{
    AllTrainings, ApproveTrainingReschedule, CancelTraining, RejectTrainingReschedule,
    RequestTrainingReschedule, RescheduleTraining, ScheduleTraining, TrainingsForUser,
};
use crate::{CommandHandler, QueryHandler, TrainingRepository};
use gymhours_domain::{Availability, DomainError, ErrorKind, UserType};
use time::Duration;

const TRAINING_UUID: &str = "training-1";

fn schedule(fixture: &Fixture, uuid: &str, time: time::OffsetDateTime) -> Result<(), crate::AppError> {
    fixture
        .apps
        .trainings
        .commands
        .schedule_training
        .handle(ScheduleTraining {
            training_uuid: uuid.to_string(),
            user_uuid: ATTENDEE_UUID.to_string(),
            user_name: String::from("Mariusz"),
            training_time: time,
            notes: String::from("first session"),
        })
}

fn booked_fixture() -> Fixture {
    let fixture = create_fixture();
    fixture.create_attendee(ATTENDEE_UUID, 5);
    fixture.make_available(&[HOUR, OTHER_HOUR]);
    schedule(&fixture, TRAINING_UUID, HOUR).unwrap();
    fixture
}

fn training(fixture: &Fixture) -> gymhours_domain::Training {
    fixture
        .store
        .get_training(TRAINING_UUID, &trainer())
        .unwrap()
}

#[test]
fn test_schedule_training_charges_balance_and_books_hour() {
    let fixture = booked_fixture();

    assert_eq!(fixture.balance(ATTENDEE_UUID), 4);
    assert_eq!(
        fixture.availability(HOUR),
        Some(Availability::TrainingScheduled)
    );
    let training = training(&fixture);
    assert_eq!(training.time(), HOUR);
    assert_eq!(training.notes(), "first session");
}

#[test]
fn test_schedule_training_without_balance_fails_before_booking() {
    let fixture = create_fixture();
    fixture.create_attendee(ATTENDEE_UUID, 0);
    fixture.make_available(&[HOUR]);

    let err = schedule(&fixture, TRAINING_UUID, HOUR).unwrap_err();

    assert_eq!(err.operation(), Some("update-balance-failed"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(fixture.availability(HOUR), Some(Availability::Available));
}

#[test]
fn test_schedule_training_on_unavailable_hour_reports_gap() {
    let fixture = create_fixture();
    fixture.create_attendee(ATTENDEE_UUID, 5);

    let err = schedule(&fixture, TRAINING_UUID, HOUR).unwrap_err();

    assert_eq!(err.operation(), Some("schedule-training-failed"));
    assert_eq!(err.domain_error(), Some(&DomainError::HourNotAvailable));
    // The trainer context's verdict crosses the adapter unchanged.
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(!err.is_retryable());
    // No compensation across contexts: the charge and the row stay.
    assert_eq!(fixture.balance(ATTENDEE_UUID), 4);
    assert!(fixture.store.get_training(TRAINING_UUID, &trainer()).is_ok());
}

#[test]
fn test_schedule_training_rejects_long_notes() {
    let fixture = create_fixture();
    fixture.create_attendee(ATTENDEE_UUID, 5);
    fixture.make_available(&[HOUR]);

    let err = fixture
        .apps
        .trainings
        .commands
        .schedule_training
        .handle(ScheduleTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user_uuid: ATTENDEE_UUID.to_string(),
            user_name: String::from("Mariusz"),
            training_time: HOUR,
            notes: "x".repeat(1001),
        })
        .unwrap_err();

    assert_eq!(err.operation(), Some("invalid-training-data"));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(fixture.balance(ATTENDEE_UUID), 5);
}

#[test]
fn test_duplicate_training_is_a_conflict() {
    let fixture = booked_fixture();
    let err = schedule(&fixture, TRAINING_UUID, OTHER_HOUR).unwrap_err();
    assert_eq!(err.operation(), Some("add-training-failed"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_reschedule_training_moves_hour() {
    let fixture = booked_fixture();

    fixture
        .apps
        .trainings
        .commands
        .reschedule_training
        .handle(RescheduleTraining {
            training_uuid: TRAINING_UUID.to_string(),
            new_time: OTHER_HOUR,
            new_notes: String::from("moved"),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    let training = training(&fixture);
    assert_eq!(training.time(), OTHER_HOUR);
    assert_eq!(training.notes(), "moved");
    assert_eq!(fixture.availability(HOUR), Some(Availability::Available));
    assert_eq!(
        fixture.availability(OTHER_HOUR),
        Some(Availability::TrainingScheduled)
    );
}

#[test]
fn test_reschedule_too_late_leaves_everything_unchanged() {
    let fixture = booked_fixture();
    fixture.clock.set(HOUR - Duration::hours(23));

    let err = fixture
        .apps
        .trainings
        .commands
        .reschedule_training
        .handle(RescheduleTraining {
            training_uuid: TRAINING_UUID.to_string(),
            new_time: OTHER_HOUR,
            new_notes: String::from("moved"),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap_err();

    assert_eq!(err.operation(), Some("reschedule-training-failed"));
    assert_eq!(err.slug(), "cant-reschedule-before-time");
    let training = training(&fixture);
    assert_eq!(training.time(), HOUR);
    assert_eq!(training.notes(), "first session");
    assert_eq!(
        fixture.availability(HOUR),
        Some(Availability::TrainingScheduled)
    );
    assert_eq!(
        fixture.availability(OTHER_HOUR),
        Some(Availability::Available)
    );
}

#[test]
fn test_reschedule_to_unavailable_hour_aborts_training_update() {
    let fixture = booked_fixture();
    let closed_hour = HOUR + Duration::hours(3);

    let err = fixture
        .apps
        .trainings
        .commands
        .reschedule_training
        .handle(RescheduleTraining {
            training_uuid: TRAINING_UUID.to_string(),
            new_time: closed_hour,
            new_notes: String::from("moved"),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap_err();

    assert_eq!(err.operation(), Some("move-training-failed"));
    assert_eq!(err.domain_error(), Some(&DomainError::HourNotAvailable));
    assert_eq!(training(&fixture).time(), HOUR);
    assert_eq!(
        fixture.availability(HOUR),
        Some(Availability::TrainingScheduled)
    );
}

#[test]
fn test_other_attendee_cannot_touch_training() {
    let fixture = booked_fixture();

    let err = fixture
        .apps
        .trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee("attendee-2"),
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(!training(&fixture).is_canceled());
}

#[test]
fn test_unknown_training_is_not_found() {
    let fixture = booked_fixture();

    let err = fixture
        .apps
        .trainings
        .commands
        .reject_training_reschedule
        .handle(RejectTrainingReschedule {
            training_uuid: String::from("missing"),
            user: trainer(),
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_cancel_early_refunds_credit_and_releases_hour() {
    let fixture = booked_fixture();

    fixture
        .apps
        .trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    assert!(training(&fixture).is_canceled());
    assert_eq!(fixture.balance(ATTENDEE_UUID), 5);
    assert_eq!(fixture.availability(HOUR), Some(Availability::Available));
}

#[test]
fn test_late_cancel_by_trainer_compensates_attendee() {
    let fixture = booked_fixture();
    fixture.clock.set(HOUR - Duration::hours(2));

    fixture
        .apps
        .trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: trainer(),
        })
        .unwrap();

    assert_eq!(fixture.balance(ATTENDEE_UUID), 6);
}

#[test]
fn test_late_cancel_by_attendee_forfeits_credit() {
    let fixture = booked_fixture();
    fixture.clock.set(HOUR - Duration::hours(2));

    fixture
        .apps
        .trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    assert_eq!(fixture.balance(ATTENDEE_UUID), 4);
}

#[test]
fn test_canceled_training_rejects_negotiation() {
    let fixture = booked_fixture();
    let commands = &fixture.apps.trainings.commands;
    commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    let err = commands
        .request_training_reschedule
        .handle(RequestTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            new_time: OTHER_HOUR,
            new_notes: String::new(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap_err();
    assert_eq!(err.domain_error(), Some(&DomainError::TrainingCanceled));

    let err = commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap_err();
    assert_eq!(
        err.domain_error(),
        Some(&DomainError::TrainingAlreadyCanceled)
    );
    assert_eq!(fixture.balance(ATTENDEE_UUID), 5);
}

/// Book, propose as attendee, fail to self-approve, approve as trainer.
#[test]
fn test_reschedule_negotiation_end_to_end() {
    let fixture = booked_fixture();
    let commands = &fixture.apps.trainings.commands;
    let new_time = OTHER_HOUR;

    assert_eq!(fixture.balance(ATTENDEE_UUID), 4);
    assert_eq!(
        fixture.availability(HOUR),
        Some(Availability::TrainingScheduled)
    );

    commands
        .request_training_reschedule
        .handle(RequestTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            new_time,
            new_notes: String::from("can we move?"),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    let proposed = training(&fixture);
    assert_eq!(proposed.proposed_new_time(), Some(new_time));
    assert_eq!(proposed.move_proposed_by(), Some(UserType::Attendee));
    assert_eq!(proposed.notes(), "can we move?");

    let err = commands
        .approve_training_reschedule
        .handle(ApproveTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap_err();
    assert_eq!(err.slug(), "same-user-type-approval");
    assert_eq!(training(&fixture).time(), HOUR);

    commands
        .approve_training_reschedule
        .handle(ApproveTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            user: trainer(),
        })
        .unwrap();

    let moved = training(&fixture);
    assert_eq!(moved.time(), new_time);
    assert_eq!(moved.proposed_new_time(), None);
    assert_eq!(moved.move_proposed_by(), None);
    assert_eq!(fixture.availability(HOUR), Some(Availability::Available));
    assert_eq!(
        fixture.availability(new_time),
        Some(Availability::TrainingScheduled)
    );
    assert_eq!(fixture.balance(ATTENDEE_UUID), 4);
}

#[test]
fn test_reject_reschedule_keeps_time() {
    let fixture = booked_fixture();
    let commands = &fixture.apps.trainings.commands;

    commands
        .request_training_reschedule
        .handle(RequestTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            new_time: OTHER_HOUR,
            new_notes: String::new(),
            user: trainer(),
        })
        .unwrap();
    commands
        .reject_training_reschedule
        .handle(RejectTrainingReschedule {
            training_uuid: TRAINING_UUID.to_string(),
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();

    let training = training(&fixture);
    assert_eq!(training.time(), HOUR);
    assert!(!training.is_reschedule_proposed());
}

#[test]
fn test_trainings_queries() {
    let fixture = booked_fixture();
    fixture.create_attendee("attendee-2", 1);
    fixture
        .apps
        .trainings
        .commands
        .schedule_training
        .handle(ScheduleTraining {
            training_uuid: String::from("training-2"),
            user_uuid: String::from("attendee-2"),
            user_name: String::from("Other"),
            training_time: OTHER_HOUR,
            notes: String::new(),
        })
        .unwrap();
    fixture
        .apps
        .trainings
        .commands
        .cancel_training
        .handle(CancelTraining {
            training_uuid: String::from("training-2"),
            user: attendee("attendee-2"),
        })
        .unwrap();

    let all = fixture
        .apps
        .trainings
        .queries
        .all_trainings
        .handle(AllTrainings)
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].uuid(), TRAINING_UUID);

    let own = fixture
        .apps
        .trainings
        .queries
        .trainings_for_user
        .handle(TrainingsForUser {
            user: attendee("attendee-2"),
        })
        .unwrap();
    assert!(own.is_empty());

    let own = fixture
        .apps
        .trainings
        .queries
        .trainings_for_user
        .handle(TrainingsForUser {
            user: attendee(ATTENDEE_UUID),
        })
        .unwrap();
    assert_eq!(own.len(), 1);
}

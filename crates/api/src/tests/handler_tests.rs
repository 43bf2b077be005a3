// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use super::helpers::{
    ATTENDEE_UUID, HOUR, NOW, OTHER_HOUR, TestApi, create_test_api, create_test_attendee,
    create_test_trainer,
};
use crate::{
    ApiError, AvailableHoursRequest, CreateUserRequest, HourAvailabilityRequest,
    HourUpdateRequest, PostTrainingRequest, RescheduleTrainingRequest,
    UpdateTrainingBalanceRequest, approve_training_reschedule, cancel_training, create_training,
    create_user, get_current_user, get_hour_availability, get_trainer_available_hours,
    get_trainings, make_hours_available, make_hours_unavailable, request_training_reschedule,
    reschedule_training, update_training_balance,
};

fn book(api: &TestApi, time: &str) -> Result<String, ApiError> {
    create_training(
        &api.apps,
        &create_test_attendee(),
        &PostTrainingRequest {
            time: time.to_string(),
            notes: String::from("legs"),
        },
    )
    .map(|response| response.training_uuid)
}

fn balance(api: &TestApi) -> i64 {
    get_current_user(&api.apps, &create_test_attendee(), None)
        .unwrap()
        .balance
}

#[test]
fn test_calendar_groups_hours() {
    let api = create_test_api().with_open_calendar(1);

    let dates = get_trainer_available_hours(
        &api.apps,
        &AvailableHoursRequest {
            date_from: String::from("2025-11-24T00:00:00Z"),
            date_to: String::from("2025-12-08T00:00:00Z"),
        },
    )
    .unwrap();

    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].date, "2025-12-01");
    assert!(dates[0].has_free_hours);
    assert_eq!(dates[0].hours[0].hour, HOUR);
    assert_eq!(dates[0].hours[1].hour, OTHER_HOUR);
}

#[test]
fn test_calendar_rejects_malformed_bound() {
    let api = create_test_api();
    let err = get_trainer_available_hours(
        &api.apps,
        &AvailableHoursRequest {
            date_from: String::from("yesterday"),
            date_to: String::from("2025-12-08T00:00:00Z"),
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "date_from"));
}

fn hour_available(api: &TestApi, hour: &str) -> Result<bool, ApiError> {
    get_hour_availability(
        &api.apps,
        &HourAvailabilityRequest {
            hour: hour.to_string(),
        },
    )
    .map(|response| response.available)
}

#[test]
fn test_hour_availability_follows_bookings() {
    let api = create_test_api().with_open_calendar(1);

    let response = get_hour_availability(
        &api.apps,
        &HourAvailabilityRequest {
            hour: HOUR.to_string(),
        },
    )
    .unwrap();
    assert_eq!(response.hour, HOUR);
    assert!(response.available);

    book(&api, HOUR).unwrap();

    assert!(!hour_available(&api, HOUR).unwrap());
    assert!(hour_available(&api, OTHER_HOUR).unwrap());
    assert!(!hour_available(&api, "2025-12-02T13:00:00Z").unwrap());
}

#[test]
fn test_hour_availability_rejects_malformed_hour() {
    let api = create_test_api();

    let err = hour_available(&api, "13:00").unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "hour"));
}

#[test]
fn test_only_trainer_manages_calendar() {
    let api = create_test_api();
    let request = HourUpdateRequest {
        hours: vec![HOUR.to_string()],
    };

    let err = make_hours_available(&api.apps, &create_test_attendee(), &request).unwrap_err();
    assert_eq!(err.slug(), "unauthorized");

    make_hours_available(&api.apps, &create_test_trainer(), &request).unwrap();
    make_hours_unavailable(&api.apps, &create_test_trainer(), &request).unwrap();

    let err = make_hours_unavailable(&api.apps, &create_test_trainer(), &request).unwrap_err();
    assert_eq!(err.slug(), "hour-already-not-available");
}

#[test]
fn test_invalid_hour_is_a_rule_violation() {
    let api = create_test_api();
    let err = make_hours_available(
        &api.apps,
        &create_test_trainer(),
        &HourUpdateRequest {
            hours: vec![String::from("2025-12-01T13:30:00Z")],
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::DomainRuleViolation { .. }));
    assert_eq!(err.slug(), "hour-not-full-hour");
}

#[test]
fn test_booking_flow() {
    let api = create_test_api().with_open_calendar(2);

    let training_uuid = book(&api, HOUR).unwrap();
    assert_eq!(balance(&api), 1);

    let own = get_trainings(&api.apps, &create_test_attendee(), NOW).unwrap();
    assert_eq!(own.trainings.len(), 1);
    let training = &own.trainings[0];
    assert_eq!(training.uuid, training_uuid);
    assert_eq!(training.user, "Mariusz");
    assert_eq!(training.time, HOUR);
    assert!(training.can_be_cancelled);
    assert!(!training.move_requires_accept);

    let late = get_trainings(&api.apps, &create_test_trainer(), NOW + Duration::days(7)).unwrap();
    assert!(!late.trainings[0].can_be_cancelled);

    cancel_training(&api.apps, &create_test_attendee(), &training_uuid).unwrap();
    assert_eq!(balance(&api), 2);
    assert!(
        get_trainings(&api.apps, &create_test_attendee(), NOW)
            .unwrap()
            .trainings
            .is_empty()
    );
    let all = get_trainings(&api.apps, &create_test_trainer(), NOW).unwrap();
    assert!(all.trainings[0].canceled);
}

#[test]
fn test_trainer_cannot_book() {
    let api = create_test_api().with_open_calendar(2);
    let err = create_training(
        &api.apps,
        &create_test_trainer(),
        &PostTrainingRequest {
            time: HOUR.to_string(),
            notes: String::new(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[test]
fn test_booking_without_credits_is_a_conflict() {
    let api = create_test_api().with_open_calendar(0);
    let err = book(&api, HOUR).unwrap_err();

    assert!(matches!(err, ApiError::Conflict { .. }));
    assert_eq!(err.slug(), "insufficient-balance");
}

#[test]
fn test_negotiated_reschedule() {
    let api = create_test_api().with_open_calendar(1);
    let training_uuid = book(&api, HOUR).unwrap();

    request_training_reschedule(
        &api.apps,
        &create_test_trainer(),
        &training_uuid,
        &RescheduleTrainingRequest {
            time: OTHER_HOUR.to_string(),
            notes: String::from("can we move?"),
        },
    )
    .unwrap();

    let pending = get_trainings(&api.apps, &create_test_attendee(), NOW).unwrap();
    let training = &pending.trainings[0];
    assert!(training.move_requires_accept);
    assert_eq!(training.proposed_time.as_deref(), Some(OTHER_HOUR));
    assert_eq!(training.move_proposed_by.as_deref(), Some("trainer"));

    let err = approve_training_reschedule(&api.apps, &create_test_trainer(), &training_uuid)
        .unwrap_err();
    assert_eq!(err.slug(), "same-user-type-approval");

    approve_training_reschedule(&api.apps, &create_test_attendee(), &training_uuid).unwrap();
    let moved = get_trainings(&api.apps, &create_test_attendee(), NOW).unwrap();
    assert_eq!(moved.trainings[0].time, OTHER_HOUR);
    assert_eq!(moved.trainings[0].proposed_time, None);
}

#[test]
fn test_direct_reschedule_and_visibility() {
    let api = create_test_api().with_open_calendar(1);
    let training_uuid = book(&api, HOUR).unwrap();

    reschedule_training(
        &api.apps,
        &create_test_attendee(),
        &training_uuid,
        &RescheduleTrainingRequest {
            time: OTHER_HOUR.to_string(),
            notes: String::new(),
        },
    )
    .unwrap();

    let stranger = crate::authenticate_stub("attendee-2", "attendee", "Stranger").unwrap();
    let err = cancel_training(&api.apps, &stranger, &training_uuid).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));

    let err = cancel_training(&api.apps, &create_test_attendee(), "missing").unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_user_accounts() {
    let api = create_test_api();

    let created = create_user(
        &api.apps,
        &create_test_trainer(),
        &CreateUserRequest {
            user_uuid: None,
            role: String::from("attendee"),
            display_name: String::from("Generated"),
            balance: 0,
        },
    )
    .unwrap();
    assert_eq!(created.user_uuid.len(), 36);

    let err = create_user(
        &api.apps,
        &create_test_attendee(),
        &CreateUserRequest {
            user_uuid: None,
            role: String::from("attendee"),
            display_name: String::from("Nope"),
            balance: 0,
        },
    )
    .unwrap_err();
    assert_eq!(err.slug(), "unauthorized");

    let err = create_user(
        &api.apps,
        &create_test_trainer(),
        &CreateUserRequest {
            user_uuid: None,
            role: String::from("owner"),
            display_name: String::from("Nope"),
            balance: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "role"));

    update_training_balance(
        &api.apps,
        &create_test_trainer(),
        &created.user_uuid,
        &UpdateTrainingBalanceRequest { amount_change: 3 },
    )
    .unwrap();
    let err = update_training_balance(
        &api.apps,
        &create_test_trainer(),
        &created.user_uuid,
        &UpdateTrainingBalanceRequest { amount_change: -4 },
    )
    .unwrap_err();
    assert_eq!(err.slug(), "insufficient-balance");
}

#[test]
fn test_current_user_records_ip() {
    let api = create_test_api().with_open_calendar(4);

    let current =
        get_current_user(&api.apps, &create_test_attendee(), Some("10.0.0.7")).unwrap();
    assert_eq!(current.uuid, ATTENDEE_UUID);
    assert_eq!(current.role, "attendee");
    assert_eq!(current.balance, 4);

    let missing = crate::authenticate_stub("ghost", "attendee", "Ghost").unwrap();
    let err = get_current_user(&api.apps, &missing, None).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_training_response_serializes() {
    let api = create_test_api().with_open_calendar(1);
    book(&api, HOUR).unwrap();
    let trainings = get_trainings(&api.apps, &create_test_attendee(), api.clock_now()).unwrap();

    let json = serde_json::to_value(&trainings).unwrap();
    assert_eq!(json["trainings"][0]["time"], HOUR);
    assert_eq!(json["trainings"][0]["proposed_time"], serde_json::Value::Null);
}

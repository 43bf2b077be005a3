// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_in_memory, create_test_clock};
use gymhours::UserRepository;
use gymhours_domain::{DomainError, ErrorKind, UserAccount, UserType};

fn account(uuid: &str, balance: i64) -> UserAccount {
    UserAccount::new(uuid, UserType::Attendee, "Mariusz", balance).unwrap()
}

#[test]
fn test_add_and_get_user() {
    let persistence = create_in_memory(&create_test_clock());
    persistence.add_user(&account("attendee-1", 3)).unwrap();

    let loaded = persistence.get_user("attendee-1").unwrap();
    assert_eq!(loaded, account("attendee-1", 3));
    assert_eq!(loaded.last_ip(), None);
}

#[test]
fn test_duplicate_user_is_a_conflict() {
    let persistence = create_in_memory(&create_test_clock());
    persistence.add_user(&account("attendee-1", 3)).unwrap();

    let err = persistence.add_user(&account("attendee-1", 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(persistence.get_user("attendee-1").unwrap().balance(), 3);
}

#[test]
fn test_balance_changes_and_never_goes_negative() {
    let persistence = create_in_memory(&create_test_clock());
    persistence.add_user(&account("attendee-1", 1)).unwrap();

    assert_eq!(persistence.update_balance("attendee-1", -1).unwrap(), 0);

    let err = persistence.update_balance("attendee-1", -1).unwrap_err();
    assert_eq!(
        err.domain_error(),
        Some(&DomainError::InsufficientBalance {
            user_uuid: "attendee-1".to_string(),
            balance: 0,
            amount_change: -1,
        })
    );
    assert_eq!(persistence.get_user("attendee-1").unwrap().balance(), 0);

    assert_eq!(persistence.update_balance("attendee-1", 2).unwrap(), 2);
}

#[test]
fn test_unknown_user_is_not_found() {
    let persistence = create_in_memory(&create_test_clock());

    assert_eq!(
        persistence.get_user("nobody").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        persistence.update_balance("nobody", 1).unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        persistence
            .update_last_ip("nobody", "10.0.0.1")
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_update_last_ip() {
    let persistence = create_in_memory(&create_test_clock());
    persistence.add_user(&account("attendee-1", 0)).unwrap();

    persistence.update_last_ip("attendee-1", "10.0.0.1").unwrap();
    persistence.update_last_ip("attendee-1", "10.0.0.2").unwrap();

    let loaded = persistence.get_user("attendee-1").unwrap();
    assert_eq!(loaded.last_ip(), Some("10.0.0.2"));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_in_memory, create_test_clock};
use crate::data_models::UserRow;
use crate::{Database, Persistence, PersistenceError, checkout, mutations};
use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use gymhours::{AppError, StorageError};
use gymhours_domain::ErrorKind;

fn users_connection(
    persistence: &Persistence,
) -> PooledConnection<ConnectionManager<SqliteConnection>> {
    match &persistence.users {
        Database::Sqlite(pool) => checkout(pool).unwrap(),
        #[cfg(feature = "mysql")]
        Database::Mysql(_) => unreachable!("in-memory stores are SQLite"),
    }
}

fn database_error(kind: DatabaseErrorKind, message: &str) -> PersistenceError {
    DieselError::DatabaseError(kind, Box::new(String::from(message))).into()
}

#[test]
fn test_constraint_kinds_are_mapped() {
    assert!(matches!(
        database_error(DatabaseErrorKind::UniqueViolation, "UNIQUE failed"),
        PersistenceError::UniqueViolation(_)
    ));
    assert!(matches!(
        database_error(DatabaseErrorKind::ForeignKeyViolation, "FOREIGN KEY failed"),
        PersistenceError::ForeignKeyViolation(_)
    ));
    assert!(matches!(
        database_error(DatabaseErrorKind::CheckViolation, "CHECK failed"),
        PersistenceError::CheckViolation(_)
    ));
    assert!(matches!(
        database_error(DatabaseErrorKind::NotNullViolation, "NOT NULL failed"),
        PersistenceError::CheckViolation(_)
    ));
}

#[test]
fn test_lock_messages_are_classified() {
    assert!(matches!(
        database_error(DatabaseErrorKind::Unknown, "database is locked"),
        PersistenceError::LockTimeout(_)
    ));
    assert!(matches!(
        database_error(
            DatabaseErrorKind::Unknown,
            "Lock wait timeout exceeded; try restarting transaction"
        ),
        PersistenceError::LockTimeout(_)
    ));

    let deadlock = database_error(
        DatabaseErrorKind::Unknown,
        "Deadlock found when trying to get lock; try restarting transaction",
    );
    assert!(deadlock.is_deadlock());
    assert!(database_error(DatabaseErrorKind::SerializationFailure, "serialize").is_deadlock());
    assert!(!database_error(DatabaseErrorKind::Unknown, "syntax error").is_deadlock());
}

#[test]
fn test_not_found_and_other_errors() {
    assert!(matches!(
        PersistenceError::from(DieselError::NotFound),
        PersistenceError::NotFound(_)
    ));
    assert!(matches!(
        PersistenceError::from(DieselError::RollbackTransaction),
        PersistenceError::QueryFailed(_)
    ));
}

#[test]
fn test_app_error_classification() {
    let conflict: AppError = PersistenceError::UniqueViolation("dup".to_string()).into();
    assert_eq!(conflict.kind(), ErrorKind::Conflict);
    assert_eq!(conflict.slug(), "already-exists");
    assert!(!conflict.is_retryable());

    let timeout: AppError = PersistenceError::LockTimeout("locked".to_string()).into();
    assert_eq!(timeout.slug(), "lock-timeout");
    assert!(timeout.is_retryable());

    let deadlock: AppError = PersistenceError::Deadlock("victim".to_string()).into();
    assert!(deadlock.is_retryable());

    assert_eq!(
        StorageError::from(PersistenceError::MigrationFailed("bad".to_string())),
        StorageError::Query("Migration failed: bad".to_string())
    );
    assert_eq!(
        StorageError::from(PersistenceError::CorruptedRow("bad".to_string())),
        StorageError::Corrupted("bad".to_string())
    );
}

#[test]
fn test_check_constraint_rejects_negative_balance() {
    let persistence = create_in_memory(&create_test_clock());
    let row = UserRow {
        user_id: "attendee-1".to_string(),
        user_type: "attendee".to_string(),
        display_name: "Mariusz".to_string(),
        balance: -1,
        last_ip: None,
    };

    let mut conn = users_connection(&persistence);
    let err = mutations::users::insert_user_sqlite(&mut conn, &row).unwrap_err();

    assert!(matches!(err, PersistenceError::CheckViolation(_)));
}

#[test]
fn test_check_constraint_rejects_unknown_user_type() {
    let persistence = create_in_memory(&create_test_clock());
    let row = UserRow {
        user_id: "attendee-1".to_string(),
        user_type: "admin".to_string(),
        display_name: "Mariusz".to_string(),
        balance: 0,
        last_ip: None,
    };

    let mut conn = users_connection(&persistence);
    let err = mutations::users::insert_user_sqlite(&mut conn, &row).unwrap_err();

    assert!(matches!(err, PersistenceError::CheckViolation(_)));
}

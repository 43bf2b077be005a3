// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use gymhours::{AppError, StorageError};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Database connection failed, or no pooled connection became free in time.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// A check constraint rejected the write.
    CheckViolation(String),
    /// The transaction was chosen as a deadlock victim or failed to serialize.
    Deadlock(String),
    /// A lock could not be acquired before the configured timeout.
    LockTimeout(String),
    /// A stored row holds a value the domain cannot represent.
    CorruptedRow(String),
    /// The requested resource was not found.
    NotFound(String),
    /// Query execution failed.
    QueryFailed(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key constraint violated: {msg}"),
            Self::CheckViolation(msg) => write!(f, "Check constraint violated: {msg}"),
            Self::Deadlock(msg) => write!(f, "Deadlock detected: {msg}"),
            Self::LockTimeout(msg) => write!(f, "Lock wait timeout: {msg}"),
            Self::CorruptedRow(msg) => write!(f, "Corrupted row: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl PersistenceError {
    /// Returns true if the failed transaction may succeed when run again.
    #[must_use]
    pub const fn is_deadlock(&self) -> bool {
        matches!(self, Self::Deadlock(_))
    }
}

/// Classifies driver messages that carry no structured error kind.
///
/// `SQLite` reports `SQLITE_BUSY` as "database is locked" once its busy
/// timeout expires; `MySQL` reports errors 1205 and 1213 by message only.
fn classify_message(message: &str) -> PersistenceError {
    if message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("Lock wait timeout")
    {
        PersistenceError::LockTimeout(message.to_string())
    } else if message.contains("Deadlock found") || message.contains("deadlock") {
        PersistenceError::Deadlock(message.to_string())
    } else {
        PersistenceError::QueryFailed(message.to_string())
    }
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(message),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(message),
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        Self::CheckViolation(message)
                    }
                    DatabaseErrorKind::SerializationFailure => Self::Deadlock(message),
                    DatabaseErrorKind::ClosedConnection
                    | DatabaseErrorKind::UnableToSendCommand => {
                        Self::DatabaseConnectionFailed(message)
                    }
                    _ => classify_message(&message),
                }
            }
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for PersistenceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<PersistenceError> for StorageError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(msg) => Self::UniqueViolation(msg),
            PersistenceError::ForeignKeyViolation(msg) => Self::ForeignKeyViolation(msg),
            PersistenceError::CheckViolation(msg) => Self::CheckViolation(msg),
            PersistenceError::Deadlock(msg) => Self::Deadlock(msg),
            PersistenceError::LockTimeout(msg) => Self::LockTimeout(msg),
            PersistenceError::DatabaseConnectionFailed(msg) => Self::Connection(msg),
            PersistenceError::CorruptedRow(msg) => Self::Corrupted(msg),
            other @ (PersistenceError::MigrationFailed(_)
            | PersistenceError::InitializationError(_)
            | PersistenceError::NotFound(_)
            | PersistenceError::QueryFailed(_)) => Self::Query(other.to_string()),
        }
    }
}

impl From<PersistenceError> for AppError {
    fn from(err: PersistenceError) -> Self {
        Self::Storage(err.into())
    }
}

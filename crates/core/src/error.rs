// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gymhours_domain::{DomainError, ErrorKind};
use thiserror::Error;

/// Storage failures, as reported by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    /// A check constraint rejected the write.
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),
    /// The transaction lost a deadlock or serialization race.
    #[error("Deadlock or serialization failure: {0}")]
    Deadlock(String),
    /// A row or table lock could not be acquired in time.
    #[error("Lock wait timeout: {0}")]
    LockTimeout(String),
    /// The database could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),
    /// A stored row could not be turned back into a domain object.
    #[error("Corrupted row: {0}")]
    Corrupted(String),
    /// Any other query failure.
    #[error("Query failed: {0}")]
    Query(String),
}

impl StorageError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UniqueViolation(_) => ErrorKind::Conflict,
            Self::ForeignKeyViolation(_) | Self::CheckViolation(_) => ErrorKind::Validation,
            Self::Deadlock(_)
            | Self::LockTimeout(_)
            | Self::Connection(_)
            | Self::Corrupted(_)
            | Self::Query(_) => ErrorKind::Infrastructure,
        }
    }

    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::UniqueViolation(_) => "already-exists",
            Self::ForeignKeyViolation(_) => "unknown-reference",
            Self::CheckViolation(_) => "constraint-violation",
            Self::Deadlock(_) => "deadlock",
            Self::LockTimeout(_) => "lock-timeout",
            Self::Connection(_) => "database-unavailable",
            Self::Corrupted(_) => "corrupted-data",
            Self::Query(_) => "database-error",
        }
    }

    /// Returns true if repeating the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Deadlock(_) | Self::LockTimeout(_) | Self::Connection(_)
        )
    }
}

/// Errors returned by command and query handlers.
///
/// Context added on the way up never changes the kind of the underlying
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The referenced entity does not exist.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// Kind of entity, e.g. `training`.
        resource: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// The storage layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A lower-level error annotated by the operation that failed.
    #[error("{message}: {source}")]
    Context {
        /// Stable identifier of the failed operation.
        slug: &'static str,
        /// Human readable description of the failed operation.
        message: String,
        /// The underlying error.
        source: Box<AppError>,
    },
}

impl AppError {
    /// Builds a not-found error.
    #[must_use]
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Wraps the error with the operation that failed.
    #[must_use]
    pub fn context(self, slug: &'static str, message: impl Into<String>) -> Self {
        Self::Context {
            slug,
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every context layer.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the kind of the underlying failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Domain(err) => err.kind(),
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(err) => err.kind(),
            Self::Context { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Returns the identifier of the rule or failure at the root.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self.root() {
            Self::Domain(err) => err.slug(),
            Self::NotFound { .. } => "not-found",
            Self::Storage(err) => err.slug(),
            Self::Context { slug, .. } => *slug,
        }
    }

    /// Returns the identifier of the outermost failed operation, if any
    /// context was attached.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Context { slug, .. } => Some(*slug),
            _ => None,
        }
    }

    /// Returns the domain error at the root, if there is one.
    #[must_use]
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self.root() {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if repeating the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Self::Storage(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Attaches operation context to fallible results.
pub trait ResultExt<T> {
    /// Wraps the error, if any, with the operation that failed.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in `AppError::Context`.
    fn context(self, slug: &'static str, message: &str) -> Result<T, AppError>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn context(self, slug: &'static str, message: &str) -> Result<T, AppError> {
        self.map_err(|err| {
            let err: AppError = err.into();
            err.context(slug, message)
        })
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use gymhours::AppError;
use gymhours_domain::ErrorKind;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from application errors and represent the API contract.
/// Every variant carries a stable slug clients can match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The caller may not see or act on the resource.
    Forbidden {
        /// The rule that denied access.
        rule: String,
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The request conflicts with the current state.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Storage or a dependent service is temporarily unavailable.
    Unavailable {
        /// The failure that occurred.
        rule: String,
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable, machine-readable identifier of this error.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::AuthenticationFailed { .. } => "authentication-failed",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { rule, .. }
            | Self::DomainRuleViolation { rule, .. }
            | Self::Conflict { rule, .. }
            | Self::Unavailable { rule, .. } => rule,
            Self::InvalidInput { .. } => "invalid-input",
            Self::ResourceNotFound { .. } => "not-found",
            Self::Internal { .. } => "internal-error",
        }
    }

    /// Returns true if the same request may succeed when sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::Forbidden { rule, message } => write!(f, "Forbidden ({rule}): {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Unavailable { rule, message } => {
                write!(f, "Service unavailable ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates an application error into an API error.
///
/// The kind of the root failure picks the variant. The root slug is kept so
/// clients see the rule that failed rather than the handler that wrapped it.
#[must_use]
pub fn translate_app_error(err: &AppError) -> ApiError {
    let rule = err.slug().to_string();
    let message = err.to_string();
    match err.kind() {
        ErrorKind::Validation => ApiError::DomainRuleViolation { rule, message },
        ErrorKind::Conflict => ApiError::Conflict { rule, message },
        ErrorKind::NotFound => ApiError::ResourceNotFound {
            resource_type: not_found_resource(err),
            message,
        },
        ErrorKind::Authorization => ApiError::Forbidden { rule, message },
        ErrorKind::Infrastructure if err.is_retryable() => ApiError::Unavailable { rule, message },
        ErrorKind::Infrastructure => ApiError::Internal { message },
    }
}

fn not_found_resource(err: &AppError) -> String {
    match err.root() {
        AppError::NotFound { resource, .. } => (*resource).to_string(),
        _ => String::from("resource"),
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        translate_app_error(&err)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization at the API boundary.
//!
//! Identity comes from an upstream provider. This crate only turns the
//! supplied `(uuid, role, display name)` triple into a domain [`User`] and
//! checks role-level permissions. Per-training visibility is enforced by
//! the repositories.

use gymhours_domain::{User, UserType};

use crate::error::AuthError;

/// Builds the authenticated caller from identity supplied by the transport.
///
/// # Errors
///
/// Returns an error if the id or name is empty or the role is unknown.
pub fn authenticate_stub(
    user_id: &str,
    role: &str,
    display_name: &str,
) -> Result<User, AuthError> {
    if user_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("missing user id"),
        });
    }
    let user_type: UserType = role.parse().map_err(|_| AuthError::AuthenticationFailed {
        reason: format!("unknown role '{role}'"),
    })?;
    User::new(user_id, user_type, display_name).map_err(|e| AuthError::AuthenticationFailed {
        reason: e.to_string(),
    })
}

/// Role checks for operations restricted to one side of a booking.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Only trainers manage the calendar and user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not a trainer.
    pub fn authorize_trainer(user: &User, action: &str) -> Result<(), AuthError> {
        Self::require(user, UserType::Trainer, action)
    }

    /// Only attendees book trainings for themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an attendee.
    pub fn authorize_attendee(user: &User, action: &str) -> Result<(), AuthError> {
        Self::require(user, UserType::Attendee, action)
    }

    fn require(user: &User, role: UserType, action: &str) -> Result<(), AuthError> {
        if user.user_type() == role {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: role.to_string(),
            })
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::training::Training;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of a user in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Runs trainings and owns the calendar.
    Trainer,
    /// Books trainings.
    Attendee,
}

impl UserType {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Attendee => "attendee",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "trainer" => Ok(Self::Trainer),
            "attendee" => Ok(Self::Attendee),
            _ => Err(DomainError::InvalidUserType(s.to_string())),
        }
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    uuid: String,
    user_type: UserType,
    display_name: String,
}

impl User {
    /// Creates a user identity.
    ///
    /// # Errors
    ///
    /// Returns an error if `uuid` or `display_name` is empty.
    pub fn new(uuid: &str, user_type: UserType, display_name: &str) -> Result<Self, DomainError> {
        if uuid.trim().is_empty() {
            return Err(DomainError::MissingUserField("uuid"));
        }
        if display_name.trim().is_empty() {
            return Err(DomainError::MissingUserField("display name"));
        }
        Ok(Self {
            uuid: uuid.to_string(),
            user_type,
            display_name: display_name.to_string(),
        })
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    #[must_use]
    pub const fn user_type(&self) -> UserType {
        self.user_type
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Checks whether `user` may see `training`.
///
/// Trainers see every training; attendees only their own.
///
/// # Errors
///
/// Returns `DomainError::ForbiddenToSeeTraining` otherwise.
pub fn can_user_see_training(user: &User, training: &Training) -> Result<(), DomainError> {
    if user.user_type() == UserType::Trainer || user.uuid() == training.user_uuid() {
        return Ok(());
    }
    Err(DomainError::ForbiddenToSeeTraining {
        user_uuid: user.uuid().to_string(),
        owner_uuid: training.user_uuid().to_string(),
    })
}

/// A user account in the users context.
///
/// The balance counts training credits; it never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    uuid: String,
    user_type: UserType,
    display_name: String,
    balance: i64,
    last_ip: Option<String>,
}

impl UserAccount {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is empty or the initial
    /// balance is negative.
    pub fn new(
        uuid: &str,
        user_type: UserType,
        display_name: &str,
        balance: i64,
    ) -> Result<Self, DomainError> {
        let identity = User::new(uuid, user_type, display_name)?;
        if balance < 0 {
            return Err(DomainError::InsufficientBalance {
                user_uuid: uuid.to_string(),
                balance: 0,
                amount_change: balance,
            });
        }
        Ok(Self {
            uuid: identity.uuid,
            user_type,
            display_name: identity.display_name,
            balance,
            last_ip: None,
        })
    }

    /// Rebuilds an account from storage.
    #[must_use]
    pub const fn unmarshal_from_database(
        uuid: String,
        user_type: UserType,
        display_name: String,
        balance: i64,
        last_ip: Option<String>,
    ) -> Self {
        Self {
            uuid,
            user_type,
            display_name,
            balance,
            last_ip,
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    #[must_use]
    pub const fn user_type(&self) -> UserType {
        self.user_type
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    #[must_use]
    pub fn last_ip(&self) -> Option<&str> {
        self.last_ip.as_deref()
    }

    /// Applies a balance change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientBalance` if the balance would drop
    /// below zero; the account is left unchanged.
    pub fn change_balance(&mut self, amount_change: i64) -> Result<i64, DomainError> {
        let new_balance = self.balance.checked_add(amount_change).filter(|b| *b >= 0);
        match new_balance {
            Some(balance) => {
                self.balance = balance;
                Ok(balance)
            }
            None => Err(DomainError::InsufficientBalance {
                user_uuid: self.uuid.clone(),
                balance: self.balance,
                amount_change,
            }),
        }
    }

    /// Records the address of the latest request.
    pub fn update_last_ip(&mut self, ip: &str) {
        self.last_ip = Some(ip.to_string());
    }
}

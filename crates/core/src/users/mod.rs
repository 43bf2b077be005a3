// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The users context: accounts and training balances.

use crate::decorator::{
    CommandHandler, Observability, QueryHandler, apply_command_decorators, apply_query_decorators,
};
use crate::error::{AppError, ResultExt};
use crate::ports::UserRepository;
use gymhours_domain::{UserAccount, UserType};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub user_uuid: String,
    pub user_type: UserType,
    pub display_name: String,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTrainingBalance {
    pub user_uuid: String,
    pub amount_change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLastIp {
    pub user_uuid: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_uuid: String,
}

pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl CommandHandler<CreateUser> for CreateUserHandler {
    fn handle(&self, command: CreateUser) -> Result<(), AppError> {
        let account = UserAccount::new(
            &command.user_uuid,
            command.user_type,
            &command.display_name,
            command.balance,
        )
        .context("invalid-user-data", "invalid user data")?;
        self.users
            .add_user(&account)
            .context("create-user-failed", "unable to create user")
    }
}

pub struct UpdateTrainingBalanceHandler {
    users: Arc<dyn UserRepository>,
}

impl CommandHandler<UpdateTrainingBalance> for UpdateTrainingBalanceHandler {
    fn handle(&self, command: UpdateTrainingBalance) -> Result<(), AppError> {
        self.users
            .update_balance(&command.user_uuid, command.amount_change)
            .context("update-balance-failed", "unable to change trainings balance")?;
        Ok(())
    }
}

pub struct UpdateLastIpHandler {
    users: Arc<dyn UserRepository>,
}

impl CommandHandler<UpdateLastIp> for UpdateLastIpHandler {
    fn handle(&self, command: UpdateLastIp) -> Result<(), AppError> {
        self.users
            .update_last_ip(&command.user_uuid, &command.ip)
            .context("update-last-ip-failed", "unable to update last IP")
    }
}

pub struct CurrentUserHandler {
    users: Arc<dyn UserRepository>,
}

impl QueryHandler<CurrentUser, UserAccount> for CurrentUserHandler {
    fn handle(&self, query: CurrentUser) -> Result<UserAccount, AppError> {
        self.users.get_user(&query.user_uuid)
    }
}

pub struct UsersCommands {
    pub create_user: Box<dyn CommandHandler<CreateUser>>,
    pub update_training_balance: Box<dyn CommandHandler<UpdateTrainingBalance>>,
    pub update_last_ip: Box<dyn CommandHandler<UpdateLastIp>>,
}

pub struct UsersQueries {
    pub current_user: Box<dyn QueryHandler<CurrentUser, UserAccount>>,
}

/// Every handler of the users context, decorated.
pub struct UsersApplication {
    pub commands: UsersCommands,
    pub queries: UsersQueries,
}

impl UsersApplication {
    pub fn new(users: &Arc<dyn UserRepository>, observability: &Observability) -> Self {
        Self {
            commands: UsersCommands {
                create_user: apply_command_decorators(
                    CreateUserHandler {
                        users: Arc::clone(users),
                    },
                    "users.create_user",
                    observability,
                ),
                update_training_balance: apply_command_decorators(
                    UpdateTrainingBalanceHandler {
                        users: Arc::clone(users),
                    },
                    "users.update_training_balance",
                    observability,
                ),
                update_last_ip: apply_command_decorators(
                    UpdateLastIpHandler {
                        users: Arc::clone(users),
                    },
                    "users.update_last_ip",
                    observability,
                ),
            },
            queries: UsersQueries {
                current_user: apply_query_decorators(
                    CurrentUserHandler {
                        users: Arc::clone(users),
                    },
                    "users.current_user",
                    observability,
                ),
            },
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decorator::QueryHandler;
use crate::error::AppError;
use crate::ports::TrainingsReadModel;
use gymhours_domain::{Training, User};
use std::sync::Arc;

/// Every training, canceled ones included. Meant for trainers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllTrainings;

/// The caller's own upcoming trainings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingsForUser {
    pub user: User,
}

pub struct AllTrainingsHandler {
    read_model: Arc<dyn TrainingsReadModel>,
}

impl AllTrainingsHandler {
    pub fn new(read_model: Arc<dyn TrainingsReadModel>) -> Self {
        Self { read_model }
    }
}

impl QueryHandler<AllTrainings, Vec<Training>> for AllTrainingsHandler {
    fn handle(&self, _query: AllTrainings) -> Result<Vec<Training>, AppError> {
        self.read_model.all_trainings()
    }
}

pub struct TrainingsForUserHandler {
    read_model: Arc<dyn TrainingsReadModel>,
}

impl TrainingsForUserHandler {
    pub fn new(read_model: Arc<dyn TrainingsReadModel>) -> Self {
        Self { read_model }
    }
}

impl QueryHandler<TrainingsForUser, Vec<Training>> for TrainingsForUserHandler {
    fn handle(&self, query: TrainingsForUser) -> Result<Vec<Training>, AppError> {
        self.read_model.find_trainings_for_user(query.user.uuid())
    }
}

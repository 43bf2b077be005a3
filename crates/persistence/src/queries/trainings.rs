// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::TrainingRow;
use crate::diesel_schema::trainings;
use crate::error::PersistenceError;

backend_fn! {
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_training(
    conn: &mut _,
    training_id: &str,
) -> Result<Option<TrainingRow>, PersistenceError> {
    Ok(trainings::table
        .filter(trainings::training_id.eq(training_id))
        .select(TrainingRow::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Lists every training, canceled ones included, by time.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn all_trainings(conn: &mut _) -> Result<Vec<TrainingRow>, PersistenceError> {
    Ok(trainings::table
        .order((trainings::training_time.asc(), trainings::training_id.asc()))
        .select(TrainingRow::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Lists the trainings of one attendee that are still active.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn trainings_for_user(
    conn: &mut _,
    user_id: &str,
) -> Result<Vec<TrainingRow>, PersistenceError> {
    Ok(trainings::table
        .filter(trainings::user_id.eq(user_id))
        .filter(trainings::canceled.eq(0))
        .order((trainings::training_time.asc(), trainings::training_id.asc()))
        .select(TrainingRow::as_select())
        .load(conn)?)
}
}

/// Reads and locks the training row until the surrounding transaction ends.
///
/// # Errors
///
/// Returns an error if the query fails or the lock wait times out.
#[cfg(feature = "mysql")]
pub fn lock_training_mysql(
    conn: &mut diesel::MysqlConnection,
    training_id: &str,
) -> Result<Option<TrainingRow>, PersistenceError> {
    Ok(trainings::table
        .filter(trainings::training_id.eq(training_id))
        .select(TrainingRow::as_select())
        .for_update()
        .first(conn)
        .optional()?)
}

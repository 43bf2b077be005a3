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
/// Returns `PersistenceError::UniqueViolation` if the id is taken.
pub fn insert_training(conn: &mut _, row: &TrainingRow) -> Result<(), PersistenceError> {
    diesel::insert_into(trainings::table)
        .values(row)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Writes every mutable column of a training.
///
/// # Errors
///
/// Returns an error if the statement fails or the training does not exist.
pub fn save_training(conn: &mut _, row: &TrainingRow) -> Result<(), PersistenceError> {
    let updated = diesel::update(trainings::table)
        .filter(trainings::training_id.eq(&row.training_id))
        .set((
            trainings::training_time.eq(row.training_time),
            trainings::notes.eq(&row.notes),
            trainings::proposed_new_time.eq(row.proposed_new_time),
            trainings::move_proposed_by.eq(&row.move_proposed_by),
            trainings::canceled.eq(row.canceled),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "training {}",
            row.training_id
        )));
    }
    Ok(())
}
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::trainer_hours;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts the hour unless a row for `hour_time` already exists.
///
/// Returns the number of inserted rows: 0 when another transaction won the
/// race.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn insert_hour_if_missing(
    conn: &mut _,
    hour_time: i64,
    availability: &str,
) -> Result<usize, PersistenceError> {
    let inserted = diesel::insert_or_ignore_into(trainer_hours::table)
        .values((
            trainer_hours::hour_time.eq(hour_time),
            trainer_hours::availability.eq(availability),
        ))
        .execute(conn)?;
    debug!(hour_time, inserted, "Inserted missing trainer hour");
    Ok(inserted)
}
}

backend_fn! {
/// # Errors
///
/// Returns an error if the statement fails or no row has `hour_id`.
pub fn set_hour_availability(
    conn: &mut _,
    hour_id: i64,
    availability: &str,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(trainer_hours::table)
        .filter(trainer_hours::hour_id.eq(hour_id))
        .set(trainer_hours::availability.eq(availability))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("trainer hour {hour_id}")));
    }
    Ok(())
}
}

backend_fn! {
/// Removes the stored row for an hour, returning it to the untouched state.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn delete_hour(conn: &mut _, hour_time: i64) -> Result<bool, PersistenceError> {
    let deleted = diesel::delete(trainer_hours::table)
        .filter(trainer_hours::hour_time.eq(hour_time))
        .execute(conn)?;
    Ok(deleted > 0)
}
}

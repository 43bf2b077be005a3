// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::HourRow;
use crate::diesel_schema::trainer_hours;
use crate::error::PersistenceError;

backend_fn! {
/// Reads the hour stored for a timestamp, without locking it.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_hour(conn: &mut _, hour_time: i64) -> Result<Option<HourRow>, PersistenceError> {
    Ok(trainer_hours::table
        .filter(trainer_hours::hour_time.eq(hour_time))
        .select(HourRow::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Lists stored hours in `[from, to]`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn hours_between(conn: &mut _, from: i64, to: i64) -> Result<Vec<HourRow>, PersistenceError> {
    Ok(trainer_hours::table
        .filter(trainer_hours::hour_time.between(from, to))
        .order(trainer_hours::hour_time.asc())
        .select(HourRow::as_select())
        .load(conn)?)
}
}

/// Reads and locks the hour row until the surrounding transaction ends.
///
/// # Errors
///
/// Returns an error if the query fails or the lock wait times out.
#[cfg(feature = "mysql")]
pub fn lock_hour_mysql(
    conn: &mut diesel::MysqlConnection,
    hour_time: i64,
) -> Result<Option<HourRow>, PersistenceError> {
    Ok(trainer_hours::table
        .filter(trainer_hours::hour_time.eq(hour_time))
        .select(HourRow::as_select())
        .for_update()
        .first(conn)
        .optional()?)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Outcome of a guarded balance update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    /// The change was applied; holds the new balance.
    Applied(i64),
    /// The change would make the balance negative; holds the current balance.
    Insufficient(i64),
    /// No such user.
    UnknownUser,
}

backend_fn! {
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the id is taken.
pub fn insert_user(conn: &mut _, row: &UserRow) -> Result<(), PersistenceError> {
    diesel::insert_into(users::table).values(row).execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Adds `amount_change` to the balance in one guarded statement, so
/// concurrent changes never take it below zero.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn change_balance(
    conn: &mut _,
    user_id: &str,
    amount_change: i64,
) -> Result<BalanceChange, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated = diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .filter((users::balance + amount_change).ge(0_i64))
            .set(users::balance.eq(users::balance + amount_change))
            .execute(conn)?;

        let balance: Option<i64> = users::table
            .filter(users::user_id.eq(user_id))
            .select(users::balance)
            .first(conn)
            .optional()?;

        Ok(match (updated, balance) {
            (_, None) => BalanceChange::UnknownUser,
            (0, Some(balance)) => BalanceChange::Insufficient(balance),
            (_, Some(balance)) => BalanceChange::Applied(balance),
        })
    })
}
}

backend_fn! {
/// # Errors
///
/// Returns an error if the statement fails.
pub fn set_last_ip(conn: &mut _, user_id: &str, ip: &str) -> Result<bool, PersistenceError> {
    let updated = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_ip.eq(Some(ip)))
        .execute(conn)?;
    Ok(updated > 0)
}
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

backend_fn! {
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_user(conn: &mut _, user_id: &str) -> Result<Option<UserRow>, PersistenceError> {
    Ok(users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?)
}
}

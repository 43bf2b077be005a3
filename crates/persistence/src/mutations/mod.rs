// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing statements.
//!
//! Like the queries, each mutation is generated per backend by
//! `backend_fn!`. Transactions and row locks are opened by the caller
//! through `PersistenceBackend`, not here.

pub mod hours;
pub mod trainings;
pub mod users;

pub use users::BalanceChange;

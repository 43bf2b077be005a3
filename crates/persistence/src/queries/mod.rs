// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every query is generated once per backend by `backend_fn!`: the
//! `_sqlite` variant always, the `_mysql` variant with the `mysql` feature.

pub mod hours;
pub mod trainings;
pub mod users;

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every function is generated twice by `backend_fn!`, suffixed `_sqlite`
//! and (with the `mysql` feature) `_mysql`. The `Persistence` adapter in
//! `lib.rs` picks the version for the open connection.
//!
//! - `operators` — operators and sessions
//! - `timeline` — job timeline entries
//! - `clients`, `fleet`, `bookings` — intake and dispatch
//! - `ledger` — prepaid accounts, top-ups, expense transactions
//! - `maintenance`, `procurement`, `workdrive`

pub mod bookings;
pub mod clients;
pub mod fleet;
pub mod ledger;
pub mod maintenance;
pub mod operators;
pub mod procurement;
pub mod timeline;
pub mod workdrive;

pub use operators::verify_password;

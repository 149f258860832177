// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Multi-step writes run inside one `conn.transaction`, so a failure part
//! way through leaves the database unchanged. Only `get_last_insert_rowid`
//! comes from the backend-specific layer; everything else is Diesel DSL.

pub mod bookings;
pub mod clients;
pub mod fleet;
pub mod ledger;
pub mod maintenance;
pub mod operators;
pub mod procurement;
pub mod timeline;
pub mod workdrive;

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP routes, one module per area of the back office.
//!
//! Each route locks the database, calls the matching `fleetdesk_api`
//! handler, releases the lock, and then publishes a [`LiveEvent`] so open
//! UIs refetch. Writes take their audit cause from [`RequestCause`].
//!
//! [`LiveEvent`]: crate::live::LiveEvent
//! [`RequestCause`]: crate::http::RequestCause

pub mod auth;
pub mod bookings;
pub mod clients;
pub mod fleet;
pub mod ledger;
pub mod maintenance;
pub mod procurement;
pub mod reports;
pub mod workdrive;


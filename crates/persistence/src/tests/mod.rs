// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod client_tests;
mod initialization_tests;
mod operator_tests;

#[cfg(feature = "mysql")]
mod backend_validation_tests;

use crate::Persistence;
use fleetdesk::{Booking, Command, TransitionResult, apply, apply_intake};
use fleetdesk_audit::{Actor, Cause};
use fleetdesk_domain::{BookingDraft, Money, PhoneNumber, validate_booking_fields};
use time::Date;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_date() -> Date {
    Date::from_calendar_date(2026, time::Month::March, 14).expect("Valid test date")
}

pub fn create_test_draft(phone: &str, company: Option<&str>) -> BookingDraft {
    BookingDraft {
        client_name: String::from("Adaeze Okafor"),
        client_phone: String::from(phone),
        client_company: company.map(String::from),
        client_email: Some(String::from("adaeze@example.com")),
        client_address: None,
        pickup_address: String::from("12 Wharf Road, Apapa"),
        dropoff_address: String::from("Plot 4, Kubwa, Abuja"),
        route: Some(String::from("Lagos - Abuja")),
        cargo_description: String::from("40 cartons of tiles"),
        pickup_date: create_test_date(),
        budget: Money::from_kobo(45_000_000),
        notes: None,
    }
}

/// Runs intake for `draft` and stores the resulting `Open` booking.
pub fn create_test_booking(persistence: &mut Persistence, draft: &BookingDraft) -> Booking {
    let phone: PhoneNumber = validate_booking_fields(draft).unwrap();
    let (client_id, _) = persistence
        .upsert_client_for_booking(draft, &phone)
        .unwrap();
    let job_id = persistence.generate_job_id(create_test_date()).unwrap();
    let intake: TransitionResult = apply_intake(
        draft,
        job_id,
        client_id,
        None,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.insert_booking(&intake).unwrap().booking
}

/// Applies `command` to the stored booking and persists the result.
pub fn transition(persistence: &mut Persistence, booking: &Booking, command: Command) -> Booking {
    let result = apply(booking, command, create_test_actor(), create_test_cause()).unwrap();
    persistence.update_booking(&result).unwrap().booking
}

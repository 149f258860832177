// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Booking, Command, TransitionResult, apply};
use fleetdesk_audit::{Actor, Cause};
use fleetdesk_domain::{BookingDraft, BookingStatus, JobId, Money, PaymentStatus};
use time::macros::date;

pub fn create_test_actor() -> Actor {
    Actor::with_operator(
        String::from("operator-2"),
        String::from("operator"),
        2,
        String::from("DISPATCH"),
        String::from("Chidi Eze"),
    )
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Dispatch desk"))
}

pub fn create_test_job_id() -> JobId {
    "JOB-20261016-0001".parse().unwrap()
}

pub fn create_test_draft() -> BookingDraft {
    BookingDraft {
        client_name: String::from("Ada Okafor"),
        client_phone: String::from("08031234567"),
        client_company: Some(String::from("Okafor Foods")),
        client_email: None,
        client_address: None,
        pickup_address: String::from("12 Wharf Rd, Apapa"),
        dropoff_address: String::from("Idu Industrial, Abuja"),
        route: Some(String::from("Lagos - Abuja")),
        cargo_description: String::from("Dry goods"),
        pickup_date: date!(2026 - 10 - 20),
        budget: Money::from_naira(850_000).unwrap(),
        notes: None,
    }
}

pub fn create_test_booking(status: BookingStatus) -> Booking {
    Booking {
        booking_id: Some(1),
        job_id: create_test_job_id(),
        client_id: 1,
        pickup_address: String::from("12 Wharf Rd, Apapa"),
        dropoff_address: String::from("Idu Industrial, Abuja"),
        route: None,
        cargo_description: String::from("Dry goods"),
        pickup_date: date!(2026 - 10 - 20),
        budget: Money::from_naira(850_000).unwrap(),
        agreed_amount: None,
        status,
        driver_id: None,
        vehicle_id: None,
        fuel_amount: Money::ZERO,
        ticketing_amount: Money::ZERO,
        allowance_amount: Money::ZERO,
        payment_status: PaymentStatus::Unpaid,
        cancellation_reason: None,
        notes: None,
        created_by: Some(2),
        created_at: Some(String::from("2026-10-16 08:00:00")),
        updated_at: Some(String::from("2026-10-16 08:00:00")),
    }
}

pub fn assign_command() -> Command {
    Command::Assign {
        driver_id: 5,
        vehicle_id: 9,
        driver_name: String::from("Musa Bello"),
        vehicle_plate: String::from("KJA-123XY"),
    }
}

pub fn run(booking: &Booking, command: Command) -> TransitionResult {
    apply(booking, command, create_test_actor(), create_test_cause()).unwrap()
}

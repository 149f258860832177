// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking intake and lifecycle tests.

use fleetdesk_domain::{BookingStatus, ExpenseCategory, PaymentStatus};
use fleetdesk_persistence::Persistence;

use crate::handlers::{bookings, clients};
use crate::tests::helpers::{
    FailingNotifier, RecordingNotifier, booking_request, create_funded_account, create_persistence,
    create_test_admin, create_test_booking, create_test_cause, create_test_driver,
    create_test_operator, create_test_vehicle, lagos,
};
use crate::{
    ApiError, ApproveBookingRequest, AssignDriverRequest, CancelBookingRequest,
    CompleteBookingRequest, ExpenseCharge, IncidentInput, JobRequest, ListBookingsRequest,
    NegotiateBookingRequest, Recipient, Role, WaybillInput,
};

fn job(job_id: &str) -> JobRequest {
    JobRequest {
        job_id: String::from(job_id),
    }
}

fn fuel_charge(account_id: i64, amount: &str) -> ExpenseCharge {
    ExpenseCharge {
        account_id,
        amount: String::from(amount),
        description: Some(String::from("Diesel, Apapa depot")),
        receipt_url: None,
    }
}

#[test]
fn test_create_booking_assigns_job_id_and_opens() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let response = bookings::create_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        booking_request("Chinedu Okafor", "0803 123 4567"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();

    assert!(response.job_id.starts_with("JOB-"));
    assert!(!response.client_reused);

    let booking = bookings::get_booking(&mut persistence, &job(&response.job_id)).unwrap();
    assert_eq!(booking.booking.status, BookingStatus::Open);
    assert_eq!(booking.booking.payment_status, PaymentStatus::Unpaid);
    assert_eq!(booking.booking.budget.kobo, 45_000_000);
    assert_eq!(booking.client.phone, "08031234567");
}

#[test]
fn test_known_phone_reuses_client() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let notifier = RecordingNotifier::default();

    let first = bookings::create_booking(
        &mut persistence,
        &notifier,
        booking_request("Chinedu Okafor", "0803 123 4567"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();
    let second = bookings::create_booking(
        &mut persistence,
        &notifier,
        booking_request("C. Okafor", "+234 803 123 4567"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();

    assert!(second.client_reused);
    assert_eq!(first.client_id, second.client_id);
    assert_ne!(first.job_id, second.job_id);
    assert_eq!(clients::list_clients(&mut persistence).unwrap().clients.len(), 1);

    let client = clients::get_client(&mut persistence, first.client_id).unwrap();
    assert_eq!(client.bookings.len(), 2);
}

#[test]
fn test_create_booking_notifies_managers() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let notifier = RecordingNotifier::default();

    let response = bookings::create_booking(
        &mut persistence,
        &notifier,
        booking_request("Chinedu Okafor", "08031234567"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "New booking");
    assert_eq!(sent[0].job_id.as_deref(), Some(response.job_id.as_str()));
    assert!(sent[0].recipients.contains(&Recipient::Role(Role::Manager)));
}

#[test]
fn test_failed_notification_does_not_fail_booking() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = bookings::create_booking(
        &mut persistence,
        &FailingNotifier,
        booking_request("Chinedu Okafor", "08031234567"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_create_booking_rejects_invalid_fields_before_writing() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let mut request = booking_request("Chinedu Okafor", "08031234567");
    request.pickup_address = String::from("   ");
    let result = bookings::create_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        request,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert!(clients::list_clients(&mut persistence).unwrap().clients.is_empty());
}

#[test]
fn test_accountant_cannot_create_booking() {
    let mut persistence = create_persistence();
    let accountant = create_test_operator(&mut persistence, "accounts1", Role::Accountant);

    let result = bookings::create_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        booking_request("Chinedu Okafor", "08031234567"),
        &accountant.actor,
        &accountant.operator,
        create_test_cause(),
        lagos(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_negotiate_then_approve_records_offer_and_price() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");

    let negotiated = bookings::negotiate_booking(
        &mut persistence,
        NegotiateBookingRequest {
            job_id: job_id.clone(),
            proposed: String::from("500,000"),
            message: Some(String::from("Includes loading crew")),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(negotiated.status, BookingStatus::Negotiation);

    let offers = bookings::list_negotiations(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(offers.negotiations.len(), 1);

    let notifier = RecordingNotifier::default();
    let approved = bookings::approve_booking(
        &mut persistence,
        &notifier,
        &ApproveBookingRequest {
            job_id: job_id.clone(),
            agreed: String::from("480,000"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(approved.status, BookingStatus::Approved);
    assert_eq!(notifier.titles(), vec![String::from("Booking approved")]);

    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.booking.agreed_amount.unwrap().kobo, 48_000_000);
}

#[test]
fn test_assign_driver_without_vehicle_leaves_booking_untouched() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let driver_id = create_test_driver(&mut persistence, &admin, None, None);
    let timeline_before = bookings::get_job_timeline(&mut persistence, &job(&job_id))
        .unwrap()
        .entries
        .len();

    let result = bookings::assign_driver(
        &mut persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: None,
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "driver_has_vehicle"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }

    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.booking.status, BookingStatus::Open);
    assert_eq!(booking.booking.driver_id, None);
    assert_eq!(booking.booking.vehicle_id, None);
    let timeline_after = bookings::get_job_timeline(&mut persistence, &job(&job_id))
        .unwrap()
        .entries
        .len();
    assert_eq!(timeline_before, timeline_after);
}

#[test]
fn test_assign_driver_uses_pre_assigned_vehicle_and_charges_fuel() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "lnd-452-xa");
    let driver_login = create_test_operator(&mut persistence, "driver1", Role::Driver);
    let driver_id = create_test_driver(
        &mut persistence,
        &admin,
        Some(vehicle_id),
        Some(driver_login.operator.operator_id),
    );
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "100,000");
    let notifier = RecordingNotifier::default();

    let response = bookings::assign_driver(
        &mut persistence,
        &notifier,
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: Some(fuel_charge(account_id, "5,000")),
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.status, BookingStatus::Assigned);
    assert_eq!(response.expense_transaction_ids.len(), 1);
    assert!(response.skipped_categories.is_empty());

    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.booking.driver_id, Some(driver_id));
    assert_eq!(booking.booking.vehicle_id, Some(vehicle_id));
    assert_eq!(booking.booking.fuel_amount.kobo, 500_000);
    assert_eq!(booking.total_expenses.kobo, 500_000);

    let account = persistence.get_prepaid_account(account_id).unwrap();
    assert_eq!(account.balance_kobo, 9_500_000);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].recipients,
        vec![Recipient::Operator(driver_login.operator.operator_id)]
    );
}

#[test]
fn test_reassign_skips_categories_already_charged() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let driver_id = create_test_driver(&mut persistence, &admin, Some(vehicle_id), None);
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "100,000");

    let assign = |persistence: &mut Persistence| {
        bookings::assign_driver(
            persistence,
            &RecordingNotifier::default(),
            AssignDriverRequest {
                job_id: job_id.clone(),
                driver_id,
                fuel: Some(fuel_charge(account_id, "5,000")),
                ticketing: None,
                allowance: None,
            },
            &admin.actor,
            &admin.operator,
            create_test_cause(),
        )
        .unwrap()
    };
    assign(&mut persistence);
    let second = assign(&mut persistence);

    assert!(second.expense_transaction_ids.is_empty());
    assert_eq!(second.skipped_categories, vec![ExpenseCategory::Fuel]);
    let account = persistence.get_prepaid_account(account_id).unwrap();
    assert_eq!(account.balance_kobo, 9_500_000);
}

#[test]
fn test_assign_rejects_charge_against_wrong_account_category() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let driver_id = create_test_driver(&mut persistence, &admin, Some(vehicle_id), None);
    let tolls = create_funded_account(&mut persistence, &admin, "Toll tags", "Ticketing", "20,000");

    let result = bookings::assign_driver(
        &mut persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: Some(fuel_charge(tolls, "5,000")),
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "account_category"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.booking.status, BookingStatus::Open);
}

#[test]
fn test_trip_runs_to_closed_with_paperwork() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let driver_login = create_test_operator(&mut persistence, "driver1", Role::Driver);
    let driver_id = create_test_driver(
        &mut persistence,
        &admin,
        Some(vehicle_id),
        Some(driver_login.operator.operator_id),
    );
    bookings::assign_driver(
        &mut persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: None,
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    // The assigned driver moves their own trip.
    let started = bookings::start_trip(
        &mut persistence,
        &job(&job_id),
        &driver_login.actor,
        &driver_login.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(started.status, BookingStatus::InProgress);
    bookings::mark_in_transit(
        &mut persistence,
        &job(&job_id),
        &driver_login.actor,
        &driver_login.operator,
        create_test_cause(),
    )
    .unwrap();

    let notifier = RecordingNotifier::default();
    let completed = bookings::complete_booking(
        &mut persistence,
        &notifier,
        CompleteBookingRequest {
            job_id: job_id.clone(),
            waybills: vec![WaybillInput {
                file_url: String::from("https://files.example.com/waybills/1.pdf"),
                file_name: String::from("waybill-1.pdf"),
            }],
            incidents: vec![IncidentInput {
                description: String::from("Flat tyre near Ogere"),
                severity: String::from("low"),
            }],
            expenses: Vec::new(),
        },
        &driver_login.actor,
        &driver_login.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(completed.status, BookingStatus::Completed);
    assert!(notifier.titles().iter().any(|t| t == "Incidents reported"));

    let closed = bookings::close_booking(
        &mut persistence,
        &job(&job_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(closed.status, BookingStatus::Closed);

    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.waybills.len(), 1);
    assert_eq!(booking.incidents.len(), 1);
    assert_eq!(booking.incidents[0].severity, "Low");

    let actions: Vec<String> = bookings::get_job_timeline(&mut persistence, &job(&job_id))
        .unwrap()
        .entries
        .into_iter()
        .map(|e| e.action)
        .collect();
    for expected in [
        "CreateBooking",
        "AssignDriver",
        "StartTrip",
        "MarkInTransit",
        "CompleteBooking",
        "CloseBooking",
    ] {
        assert!(
            actions.iter().any(|a| a == expected),
            "missing {expected} in {actions:?}"
        );
    }
}

#[test]
fn test_other_driver_cannot_move_trip() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let driver_id = create_test_driver(&mut persistence, &admin, Some(vehicle_id), None);
    bookings::assign_driver(
        &mut persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: None,
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    let stranger = create_test_operator(&mut persistence, "driver2", Role::Driver);

    let result = bookings::start_trip(
        &mut persistence,
        &job(&job_id),
        &stranger.actor,
        &stranger.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_complete_from_open_is_rejected() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");

    let result = bookings::complete_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        CompleteBookingRequest {
            job_id,
            waybills: Vec::new(),
            incidents: Vec::new(),
            expenses: Vec::new(),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "booking_transition"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
}

#[test]
fn test_mark_paid_twice_stays_paid() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");

    let first = bookings::mark_paid(
        &mut persistence,
        &job(&job_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    let second = bookings::mark_paid(
        &mut persistence,
        &job(&job_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(first.payment_status, PaymentStatus::Paid);
    assert_eq!(second.payment_status, PaymentStatus::Paid);
    let booking = bookings::get_booking(&mut persistence, &job(&job_id)).unwrap();
    assert_eq!(booking.booking.payment_status, PaymentStatus::Paid);
}

#[test]
fn test_cancel_requires_reason_and_blocks_waybills() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");

    let blank = bookings::cancel_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        CancelBookingRequest {
            job_id: job_id.clone(),
            reason: String::from("  "),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    assert!(matches!(blank, Err(ApiError::InvalidInput { .. })));

    let cancelled = bookings::cancel_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        CancelBookingRequest {
            job_id: job_id.clone(),
            reason: String::from("Client postponed"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let paid = bookings::mark_paid(
        &mut persistence,
        &job(&job_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    assert!(matches!(paid, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_driver_without_record_sees_no_bookings() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    create_test_booking(&mut persistence, &admin, "08031234567");
    let driver = create_test_operator(&mut persistence, "driver1", Role::Driver);

    let all = bookings::list_bookings(
        &mut persistence,
        &ListBookingsRequest::default(),
        &admin.actor,
        &admin.operator,
        lagos(),
    )
    .unwrap();
    let own = bookings::list_bookings(
        &mut persistence,
        &ListBookingsRequest::default(),
        &driver.actor,
        &driver.operator,
        lagos(),
    )
    .unwrap();

    assert_eq!(all.bookings.len(), 1);
    assert!(own.bookings.is_empty());
}

#[test]
fn test_list_bookings_filters_by_status_and_bucket() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    create_test_booking(&mut persistence, &admin, "08031234567");

    let open_today = bookings::list_bookings(
        &mut persistence,
        &ListBookingsRequest {
            status: Some(String::from("Open")),
            bucket: Some(String::from("today")),
            ..ListBookingsRequest::default()
        },
        &admin.actor,
        &admin.operator,
        lagos(),
    )
    .unwrap();
    let closed = bookings::list_bookings(
        &mut persistence,
        &ListBookingsRequest {
            status: Some(String::from("Closed")),
            ..ListBookingsRequest::default()
        },
        &admin.actor,
        &admin.operator,
        lagos(),
    )
    .unwrap();

    assert_eq!(open_today.bookings.len(), 1);
    assert!(closed.bookings.is_empty());

    let bad = bookings::list_bookings(
        &mut persistence,
        &ListBookingsRequest {
            bucket: Some(String::from("fortnight")),
            ..ListBookingsRequest::default()
        },
        &admin.actor,
        &admin.operator,
        lagos(),
    );
    assert!(matches!(bad, Err(ApiError::InvalidInput { .. })));
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard and export tests.

use fleetdesk_domain::{BookingStatus, DateBucket, ExpenseCategory};
use fleetdesk_persistence::Persistence;

use crate::handlers::{bookings, reports};
use crate::tests::helpers::{
    RecordingNotifier, TestOperator, create_funded_account, create_persistence, create_test_admin,
    create_test_booking, create_test_cause, create_test_driver, create_test_operator,
    create_test_vehicle, lagos,
};
use crate::{
    ApiError, AssignDriverRequest, CancelBookingRequest, CompleteBookingRequest, ExpenseCharge,
    JobRequest, ReportRequest, Role,
};

/// One delivered booking with ₦5,000 of fuel and one cancelled booking.
fn seed_month(persistence: &mut Persistence, admin: &TestOperator) {
    let delivered = create_test_booking(persistence, admin, "08031234567");
    let cancelled = create_test_booking(persistence, admin, "08029876543");
    let vehicle_id = create_test_vehicle(persistence, admin, "LND-452-XA");
    let driver_id = create_test_driver(persistence, admin, Some(vehicle_id), None);
    let account_id = create_funded_account(persistence, admin, "Fuel card", "Fuel", "100,000");
    let notifier = RecordingNotifier::default();
    let job = JobRequest {
        job_id: delivered.clone(),
    };

    bookings::assign_driver(
        persistence,
        &notifier,
        AssignDriverRequest {
            job_id: delivered.clone(),
            driver_id,
            fuel: Some(ExpenseCharge {
                account_id,
                amount: String::from("5,000"),
                description: Some(String::from("Diesel, Ikeja")),
                receipt_url: None,
            }),
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    bookings::start_trip(persistence, &job, &admin.actor, &admin.operator, create_test_cause())
        .unwrap();
    bookings::mark_in_transit(persistence, &job, &admin.actor, &admin.operator, create_test_cause())
        .unwrap();
    bookings::complete_booking(
        persistence,
        &notifier,
        CompleteBookingRequest {
            job_id: delivered,
            waybills: Vec::new(),
            incidents: Vec::new(),
            expenses: Vec::new(),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    bookings::cancel_booking(
        persistence,
        &notifier,
        CancelBookingRequest {
            job_id: cancelled,
            reason: String::from("Client found another haulier"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
}

fn bucket(name: &str) -> ReportRequest {
    ReportRequest {
        bucket: Some(String::from(name)),
    }
}

#[test]
fn test_dashboard_counts_revenue_and_spend() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    seed_month(&mut persistence, &admin);

    let summary =
        reports::dashboard_summary(&mut persistence, &bucket("this_month"), &admin.actor, lagos())
            .unwrap();

    assert_eq!(summary.bucket, DateBucket::ThisMonth);
    assert_eq!(summary.total_bookings, 2);
    assert_eq!(summary.by_status.len(), BookingStatus::ALL.len());
    let count_of = |status: BookingStatus| {
        summary
            .by_status
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
    };
    assert_eq!(count_of(BookingStatus::Completed), Some(1));
    assert_eq!(count_of(BookingStatus::Cancelled), Some(1));
    assert_eq!(count_of(BookingStatus::Open), Some(0));

    assert_eq!(summary.delivered, 1);
    assert!((summary.completion_rate - 50.0).abs() < f64::EPSILON);
    // No agreed price, so the budget counts.
    assert_eq!(summary.revenue.kobo, 45_000_000);

    let fuel = summary
        .expenses_by_category
        .iter()
        .find(|c| c.category == ExpenseCategory::Fuel)
        .map(|c| c.amount.kobo);
    assert_eq!(fuel, Some(500_000));
    assert_eq!(summary.expenses_by_category.len(), ExpenseCategory::ALL.len());
    assert_eq!(summary.total_expenses.kobo, 500_000);
}

#[test]
fn test_dashboard_with_no_bookings_has_zero_rate() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let summary =
        reports::dashboard_summary(&mut persistence, &ReportRequest::default(), &admin.actor, lagos())
            .unwrap();

    assert_eq!(summary.bucket, DateBucket::All);
    assert_eq!(summary.total_bookings, 0);
    assert!(summary.completion_rate.abs() < f64::EPSILON);
    assert_eq!(summary.revenue.kobo, 0);
}

#[test]
fn test_unknown_bucket_is_rejected() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let result =
        reports::dashboard_summary(&mut persistence, &bucket("last_decade"), &admin.actor, lagos());

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "bucket"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_dispatcher_cannot_view_reports() {
    let mut persistence = create_persistence();
    let dispatcher = create_test_operator(&mut persistence, "dispatch1", Role::Dispatcher);

    let dashboard = reports::dashboard_summary(
        &mut persistence,
        &ReportRequest::default(),
        &dispatcher.actor,
        lagos(),
    );
    let export = reports::export_expenses_csv(
        &mut persistence,
        &ReportRequest::default(),
        &dispatcher.actor,
        lagos(),
    );

    assert!(matches!(dashboard, Err(ApiError::Unauthorized { .. })));
    assert!(matches!(export, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_expense_export_writes_header_and_rows() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    seed_month(&mut persistence, &admin);
    let accountant = create_test_operator(&mut persistence, "accounts1", Role::Accountant);

    let export = reports::export_expenses_csv(
        &mut persistence,
        &bucket("today"),
        &accountant.actor,
        lagos(),
    )
    .unwrap();

    assert!(export.file_name.starts_with("expenses-today-"));
    assert!(export.file_name.ends_with(".csv"));
    assert_eq!(export.row_count, 1);

    let mut lines = export.content.lines();
    assert_eq!(
        lines.next(),
        Some("date,job_id,account,category,amount_naira,description,receipt_url")
    );
    let row = lines.next().unwrap();
    assert!(row.contains("JOB-"));
    assert!(row.contains("Fuel card"));
    assert!(row.contains(",Fuel,5000.00,"));
    assert!(lines.next().is_none());
}

#[test]
fn test_empty_expense_export_still_has_header() {
    let mut persistence = create_persistence();
    let accountant = create_test_operator(&mut persistence, "accounts1", Role::Accountant);

    let export =
        reports::export_expenses_csv(&mut persistence, &bucket("all"), &accountant.actor, lagos())
            .unwrap();

    assert_eq!(export.row_count, 0);
    assert_eq!(
        export.content,
        "date,job_id,account,category,amount_naira,description,receipt_url\n"
    );
}

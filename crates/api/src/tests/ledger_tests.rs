// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepaid ledger and booking deletion tests.

use fleetdesk_domain::ExpenseCategory;
use fleetdesk_persistence::Persistence;

use crate::handlers::{bookings, ledger};
use crate::tests::helpers::{
    RecordingNotifier, TestOperator, create_funded_account, create_persistence, create_test_admin,
    create_test_booking, create_test_cause, create_test_driver, create_test_operator,
    create_test_vehicle,
};
use crate::{
    ApiError, AssignDriverRequest, CreatePrepaidAccountRequest, DeleteBookingRequest,
    ExpenseCharge, JobRequest, ListExpensesRequest, RecordExpenseRequest, Role,
    TopUpAccountRequest,
};

fn charge(account_id: i64, amount: &str) -> ExpenseCharge {
    ExpenseCharge {
        account_id,
        amount: String::from(amount),
        description: None,
        receipt_url: Some(String::from("https://files.example.com/receipts/77.jpg")),
    }
}

/// An assigned booking with ₦5,000 (assignment) and ₦3,000 (on the road)
/// of fuel charged to one account. Returns the job id and account id.
fn booking_with_two_fuel_charges(
    persistence: &mut Persistence,
    admin: &TestOperator,
) -> (String, i64) {
    let job_id = create_test_booking(persistence, admin, "08031234567");
    let vehicle_id = create_test_vehicle(persistence, admin, "LND-452-XA");
    let driver_id = create_test_driver(persistence, admin, Some(vehicle_id), None);
    let account_id = create_funded_account(persistence, admin, "Fuel card", "Fuel", "100,000");

    bookings::assign_driver(
        persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id: job_id.clone(),
            driver_id,
            fuel: Some(charge(account_id, "5,000")),
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    ledger::record_expense(
        persistence,
        RecordExpenseRequest {
            job_id: Some(job_id.clone()),
            category: String::from("Fuel"),
            charge: charge(account_id, "3,000"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    (job_id, account_id)
}

#[test]
fn test_top_up_credits_balance() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "50,000");

    let response = ledger::top_up_account(
        &mut persistence,
        TopUpAccountRequest {
            account_id,
            amount: String::from("25,000.50"),
            reference: None,
            note: Some(String::from("Weekly float")),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.balance.kobo, 7_500_050);
    assert_eq!(response.balance.display, "₦75,000.50");
    assert_eq!(ledger::list_topups(&mut persistence, Some(account_id)).unwrap().topups.len(), 2);
}

#[test]
fn test_top_up_rejects_non_positive_amount() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "50,000");

    let result = ledger::top_up_account(
        &mut persistence,
        TopUpAccountRequest {
            account_id,
            amount: String::from("0"),
            reference: None,
            note: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_duplicate_account_name_conflicts() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "50,000");

    let result = ledger::create_prepaid_account(
        &mut persistence,
        &CreatePrepaidAccountRequest {
            name: String::from("Fuel card"),
            category: String::from("Fuel"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_dispatcher_cannot_manage_ledger() {
    let mut persistence = create_persistence();
    let dispatcher = create_test_operator(&mut persistence, "dispatch1", Role::Dispatcher);

    let result = ledger::create_prepaid_account(
        &mut persistence,
        &CreatePrepaidAccountRequest {
            name: String::from("Fuel card"),
            category: String::from("Fuel"),
        },
        &dispatcher.actor,
        &dispatcher.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_record_expense_against_booking_updates_totals() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let (job_id, account_id) = booking_with_two_fuel_charges(&mut persistence, &admin);

    let booking = bookings::get_booking(
        &mut persistence,
        &JobRequest {
            job_id: job_id.clone(),
        },
    )
    .unwrap();
    assert_eq!(booking.booking.fuel_amount.kobo, 800_000);

    let listed = ledger::list_expense_transactions(
        &mut persistence,
        &ListExpensesRequest {
            account_id: Some(account_id),
            job_id: Some(job_id),
        },
    )
    .unwrap();
    assert_eq!(listed.transactions.len(), 2);
    assert_eq!(listed.total.kobo, 800_000);
    assert!(
        listed
            .transactions
            .iter()
            .all(|t| t.category == ExpenseCategory::Fuel)
    );
}

#[test]
fn test_record_expense_on_open_booking_is_rejected() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "50,000");

    let result = ledger::record_expense(
        &mut persistence,
        RecordExpenseRequest {
            job_id: Some(job_id),
            category: String::from("Fuel"),
            charge: charge(account_id, "1,000"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
    let account = persistence.get_prepaid_account(account_id).unwrap();
    assert_eq!(account.balance_kobo, 5_000_000);
}

#[test]
fn test_record_expense_without_booking_debits_account() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let account_id =
        create_funded_account(&mut persistence, &admin, "Allowances", "Allowance", "20,000");

    let response = ledger::record_expense(
        &mut persistence,
        RecordExpenseRequest {
            job_id: None,
            category: String::from("Allowance"),
            charge: charge(account_id, "2,500"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.balance.kobo, 1_750_000);
}

#[test]
fn test_delete_booking_refunds_fuel_charges_as_one_top_up() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let (job_id, account_id) = booking_with_two_fuel_charges(&mut persistence, &admin);
    assert_eq!(
        persistence.get_prepaid_account(account_id).unwrap().balance_kobo,
        9_200_000
    );
    let notifier = RecordingNotifier::default();

    let response = bookings::delete_booking(
        &mut persistence,
        &notifier,
        DeleteBookingRequest {
            job_id: job_id.clone(),
            reason: Some(String::from("Entered twice")),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.refunds.len(), 1);
    assert_eq!(response.refunds[0].account_id, account_id);
    assert_eq!(response.refunds[0].category, ExpenseCategory::Fuel);
    assert_eq!(response.refunds[0].amount.kobo, 800_000);
    assert_eq!(response.refunds[0].amount.display, "₦8,000.00");
    assert_eq!(response.summary.refund_topups, 1);
    assert_eq!(response.summary.expense_transactions, 2);

    assert_eq!(
        persistence.get_prepaid_account(account_id).unwrap().balance_kobo,
        10_000_000
    );
    let refunds: Vec<_> = ledger::list_topups(&mut persistence, Some(account_id))
        .unwrap()
        .topups
        .into_iter()
        .filter(|t| t.is_refund)
        .collect();
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0].amount_kobo, 800_000);
    assert_eq!(refunds[0].source_job_id.as_deref(), Some(job_id.as_str()));

    let reconciled = ledger::reconcile_account(
        &mut persistence,
        account_id,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(reconciled.drift.kobo, 0);
    assert_eq!(reconciled.balance.kobo, 10_000_000);
    assert_eq!(
        persistence.get_prepaid_account(account_id).unwrap().balance_kobo,
        10_000_000
    );

    let gone = bookings::get_booking(&mut persistence, &JobRequest { job_id });
    assert!(matches!(gone, Err(ApiError::ResourceNotFound { .. })));
    assert_eq!(notifier.titles(), vec![String::from("Booking deleted")]);
}

#[test]
fn test_dispatcher_delete_is_unauthorized_and_removes_nothing() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let (job_id, account_id) = booking_with_two_fuel_charges(&mut persistence, &admin);
    let dispatcher = create_test_operator(&mut persistence, "dispatch1", Role::Dispatcher);

    let result = bookings::delete_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        DeleteBookingRequest {
            job_id: job_id.clone(),
            reason: None,
        },
        &dispatcher.actor,
        &dispatcher.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    let booking = bookings::get_booking(
        &mut persistence,
        &JobRequest {
            job_id: job_id.clone(),
        },
    )
    .unwrap();
    assert_eq!(booking.total_expenses.kobo, 800_000);
    assert_eq!(
        persistence.get_prepaid_account(account_id).unwrap().balance_kobo,
        9_200_000
    );
    let timeline = bookings::get_job_timeline(&mut persistence, &JobRequest { job_id }).unwrap();
    assert!(timeline.entries.iter().all(|e| e.action != "DeleteBooking"));
}

#[test]
fn test_reconcile_without_drift_writes_no_timeline_row() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let account_id = create_funded_account(&mut persistence, &admin, "Fuel card", "Fuel", "50,000");

    let response = ledger::reconcile_account(
        &mut persistence,
        account_id,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.drift.kobo, 0);
    assert_eq!(response.balance.kobo, 5_000_000);
    assert!(response.event_id.is_none());
}

#[test]
fn test_reconcile_after_booking_deletion_keeps_refunded_balance() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let manager = create_test_operator(&mut persistence, "manager1", Role::Manager);
    let accountant = create_test_operator(&mut persistence, "books1", Role::Accountant);
    let (job_id, account_id) = booking_with_two_fuel_charges(&mut persistence, &admin);

    bookings::delete_booking(
        &mut persistence,
        &RecordingNotifier::default(),
        DeleteBookingRequest {
            job_id,
            reason: Some(String::from("Client cancelled")),
        },
        &manager.actor,
        &manager.operator,
        create_test_cause(),
    )
    .unwrap();
    let after_delete = persistence.get_prepaid_account(account_id).unwrap().balance_kobo;
    assert_eq!(after_delete, 10_000_000);

    let response = ledger::reconcile_account(
        &mut persistence,
        account_id,
        &accountant.actor,
        &accountant.operator,
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.reconciliation.drift_kobo, 0);
    assert_eq!(response.reconciliation.cached_kobo, after_delete);
    assert_eq!(response.reconciliation.computed_kobo, after_delete);
    assert!(response.event_id.is_none());
    assert_eq!(
        persistence.get_prepaid_account(account_id).unwrap().balance_kobo,
        after_delete
    );
}

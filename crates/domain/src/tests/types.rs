// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BookingStatus, DomainError, ExpenseCategory, JobId, MaintenanceStatus, PaymentStatus,
    ProcurementStatus, VehicleStatus,
};
use std::str::FromStr;
use time::macros::date;

#[test]
fn test_booking_status_strings_keep_spaces() {
    assert_eq!(BookingStatus::InProgress.as_str(), "In Progress");
    assert_eq!(BookingStatus::InTransit.to_string(), "In Transit");
    assert_eq!(
        BookingStatus::from_str("In Transit").unwrap(),
        BookingStatus::InTransit
    );
}

#[test]
fn test_booking_status_round_trips_through_serde() {
    let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
    assert_eq!(json, "\"In Progress\"");
}

#[test]
fn test_booking_status_rejects_unknown() {
    assert_eq!(
        BookingStatus::from_str("InProgress"),
        Err(DomainError::InvalidBookingStatus(String::from("InProgress")))
    );
}

#[test]
fn test_booking_forward_path_is_allowed() {
    let path = [
        BookingStatus::Open,
        BookingStatus::Negotiation,
        BookingStatus::Approved,
        BookingStatus::Assigned,
        BookingStatus::InProgress,
        BookingStatus::InTransit,
        BookingStatus::Completed,
        BookingStatus::Closed,
    ];
    for pair in path.windows(2) {
        assert!(
            pair[0].can_transition_to(pair[1]),
            "{} -> {} should be allowed",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_booking_reassignment_is_allowed() {
    assert!(BookingStatus::Assigned.can_transition_to(BookingStatus::Assigned));
}

#[test]
fn test_booking_cannot_cancel_after_trip_start() {
    assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Cancelled));
    assert!(!BookingStatus::InTransit.can_transition_to(BookingStatus::Cancelled));
    assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
}

#[test]
fn test_booking_terminal_states_go_nowhere() {
    for target in BookingStatus::ALL {
        assert!(!BookingStatus::Closed.can_transition_to(target));
        assert!(!BookingStatus::Cancelled.can_transition_to(target));
    }
    assert!(BookingStatus::Closed.is_terminal());
    assert!(BookingStatus::Cancelled.is_terminal());
    assert!(!BookingStatus::Completed.is_terminal());
}

#[test]
fn test_booking_cannot_skip_assignment() {
    assert!(!BookingStatus::Open.can_transition_to(BookingStatus::InProgress));
    assert!(!BookingStatus::Approved.can_transition_to(BookingStatus::Completed));
}

#[test]
fn test_procurement_transitions() {
    assert!(ProcurementStatus::Requested.can_transition_to(ProcurementStatus::Approved));
    assert!(ProcurementStatus::Approved.can_transition_to(ProcurementStatus::Rejected));
    assert!(ProcurementStatus::Ordered.can_transition_to(ProcurementStatus::Delivered));
    assert!(!ProcurementStatus::Requested.can_transition_to(ProcurementStatus::Ordered));
    assert!(!ProcurementStatus::Rejected.can_transition_to(ProcurementStatus::Approved));
    assert!(!ProcurementStatus::Delivered.can_transition_to(ProcurementStatus::Ordered));
}

#[test]
fn test_simple_enum_strings() {
    assert_eq!(PaymentStatus::from_str("Paid").unwrap(), PaymentStatus::Paid);
    assert_eq!(
        ExpenseCategory::from_str("Ticketing").unwrap(),
        ExpenseCategory::Ticketing
    );
    assert_eq!(
        VehicleStatus::from_str("In Maintenance").unwrap(),
        VehicleStatus::InMaintenance
    );
    assert_eq!(
        MaintenanceStatus::from_str("In Progress").unwrap(),
        MaintenanceStatus::InProgress
    );
    assert!(ExpenseCategory::from_str("fuel").is_err());
}

#[test]
fn test_job_id_compose_pads_fields() {
    let id = JobId::compose(date!(2026 - 03 - 02), 7).unwrap();
    assert_eq!(id.as_str(), "JOB-20260302-0007");
    assert_eq!(id.sequence(), 7);
    assert_eq!(id.date().unwrap(), date!(2026 - 03 - 02));
}

#[test]
fn test_job_id_compose_rejects_out_of_range_sequence() {
    assert!(JobId::compose(date!(2026 - 03 - 02), 0).is_err());
    assert!(JobId::compose(date!(2026 - 03 - 02), 10_000).is_err());
}

#[test]
fn test_job_id_parse() {
    let id: JobId = "JOB-20261231-0420".parse().unwrap();
    assert_eq!(id.sequence(), 420);

    assert!("JOB-20261332-0001".parse::<JobId>().is_err());
    assert!("JOB-2026123-0001".parse::<JobId>().is_err());
    assert!("BK-20261231-0001".parse::<JobId>().is_err());
    assert!("JOB-20261231-00a1".parse::<JobId>().is_err());
}

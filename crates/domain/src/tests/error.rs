// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_empty_field_display_names_field() {
    let err = DomainError::EmptyField {
        field: "pickup_address",
    };
    assert_eq!(err.to_string(), "pickup_address cannot be empty");
}

#[test]
fn test_transition_error_display() {
    let err = DomainError::InvalidBookingTransition {
        from: String::from("Closed"),
        to: String::from("Open"),
    };
    assert_eq!(err.to_string(), "Booking cannot move from 'Closed' to 'Open'");
}

#[test]
fn test_job_id_error_mentions_expected_format() {
    let err = DomainError::InvalidJobId(String::from("JOB-1"));
    assert!(err.to_string().contains("JOB-YYYYMMDD-NNNN"));
}

#[test]
fn test_errors_are_std_errors() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::AmountOverflow);
    assert_eq!(err.to_string(), "Amount arithmetic overflowed");
}

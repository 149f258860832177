// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_booking, create_test_draft};
use crate::{ClientUpdate, Persistence, PersistenceError};
use fleetdesk_domain::{PhoneNumber, validate_booking_fields};

#[test]
fn test_known_phone_reuses_client() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let first = create_test_booking(&mut persistence, &create_test_draft("0803 123 4567", None));
    let second = create_test_booking(&mut persistence, &create_test_draft("+234-803-123-4567", None));

    assert_eq!(first.client_id, second.client_id);
    assert_eq!(persistence.list_clients().unwrap().len(), 1);
}

#[test]
fn test_upsert_reports_reuse() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let draft = create_test_draft("08031234567", None);
    let phone: PhoneNumber = validate_booking_fields(&draft).unwrap();

    let (created, reused) = persistence.upsert_client_for_booking(&draft, &phone).unwrap();
    assert!(!reused);

    let (again, reused) = persistence.upsert_client_for_booking(&draft, &phone).unwrap();
    assert!(reused);
    assert_eq!(created, again);
}

#[test]
fn test_company_name_matches_ignoring_case() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let first = create_test_booking(
        &mut persistence,
        &create_test_draft("08031234567", Some("Dangote Cement")),
    );
    let second = create_test_booking(
        &mut persistence,
        &create_test_draft("07050000000", Some("  dangote CEMENT ")),
    );

    assert_eq!(first.client_id, second.client_id);
}

#[test]
fn test_new_phone_and_company_creates_client_with_normalized_phone() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let first = create_test_booking(&mut persistence, &create_test_draft("08031234567", Some("Acme")));
    let second =
        create_test_booking(&mut persistence, &create_test_draft("+2347050000000", Some("Other")));

    assert_ne!(first.client_id, second.client_id);
    let client = persistence.get_client(second.client_id).unwrap();
    assert_eq!(client.phone, "07050000000");
    assert_eq!(client.company.as_deref(), Some("Other"));
}

#[test]
fn test_update_client() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let booking = create_test_booking(&mut persistence, &create_test_draft("08031234567", None));

    persistence
        .update_client(
            booking.client_id,
            &ClientUpdate {
                name: String::from("Adaeze O."),
                company: Some(String::from("Okafor Logistics")),
                phone: String::from("08031234567"),
                email: None,
                address: Some(String::from("Ikeja")),
            },
        )
        .unwrap();

    let client = persistence.get_client(booking.client_id).unwrap();
    assert_eq!(client.name, "Adaeze O.");
    assert_eq!(client.email, None);
    assert_eq!(client.address.as_deref(), Some("Ikeja"));

    assert!(matches!(
        persistence.update_client(
            999,
            &ClientUpdate {
                name: String::from("x"),
                company: None,
                phone: String::from("08031234567"),
                email: None,
                address: None,
            }
        ),
        Err(PersistenceError::NotFound(_))
    ));
}

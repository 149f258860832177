// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module opens its own in-memory database, so migrations
//! and foreign key enforcement are exercised throughout. These cover the
//! initialization edges directly.

use crate::Persistence;

#[test]
fn test_persistence_initialization() {
    let result = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_operator("op1", "Operator One", "password", "Admin")
        .unwrap();

    assert_eq!(db1.count_operators().unwrap(), 1);
    assert_eq!(db2.count_operators().unwrap(), 0, "db2 must not see db1's rows");
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.list_bookings(&crate::BookingFilter::default()).is_ok());
    assert!(persistence.list_prepaid_accounts().is_ok());
    assert!(persistence.list_folders(None).is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_on() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());

    // An offer on a booking that does not exist is rejected by the FK.
    let result = persistence.insert_negotiation(
        9999,
        fleetdesk_domain::Money::from_kobo(100),
        None,
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "fleetdesk-init-test-{}.sqlite",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .create_operator("filer", "File Operator", "password", "Admin")
            .unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_operators().unwrap(), 1);

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

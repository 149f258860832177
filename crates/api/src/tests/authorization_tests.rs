// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role permission tests.

use crate::{AuthError, AuthenticatedActor, AuthorizationService, Role};

fn actor(role: Role) -> AuthenticatedActor {
    AuthenticatedActor::new(format!("{role}-1").to_uppercase(), role)
}

fn allowed(check: fn(&AuthenticatedActor) -> Result<(), AuthError>) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| check(&actor(*role)).is_ok())
        .collect()
}

#[test]
fn test_only_admin_manages_operators() {
    assert_eq!(
        allowed(AuthorizationService::authorize_manage_operators),
        vec![Role::Admin]
    );
}

#[test]
fn test_booking_deletion_is_admin_or_manager() {
    assert_eq!(
        allowed(AuthorizationService::authorize_delete_booking),
        vec![Role::Admin, Role::Manager]
    );
}

#[test]
fn test_procurement_decisions_are_admin_or_manager() {
    assert_eq!(
        allowed(AuthorizationService::authorize_decide_procurement),
        vec![Role::Admin, Role::Manager]
    );
}

#[test]
fn test_accountant_records_payment_and_expenses() {
    assert!(allowed(AuthorizationService::authorize_record_payment).contains(&Role::Accountant));
    assert!(allowed(AuthorizationService::authorize_record_expense).contains(&Role::Accountant));
    assert!(!allowed(AuthorizationService::authorize_record_payment).contains(&Role::Driver));
}

#[test]
fn test_reports_exclude_dispatcher_and_driver() {
    assert_eq!(
        allowed(AuthorizationService::authorize_view_reports),
        vec![Role::Admin, Role::Manager, Role::Accountant]
    );
}

#[test]
fn test_driver_is_read_only_for_documents() {
    let result =
        AuthorizationService::authorize_manage_documents(&actor(Role::Driver), "add_document");
    assert!(matches!(result, Err(AuthError::Unauthorized { .. })));
    assert!(
        AuthorizationService::authorize_manage_documents(&actor(Role::Accountant), "add_document")
            .is_ok()
    );
}

#[test]
fn test_driver_may_only_update_own_trip() {
    let driver = actor(Role::Driver);
    assert!(
        AuthorizationService::authorize_trip_update(&driver, "start_trip", Some(7), Some(7)).is_ok()
    );
    assert!(
        AuthorizationService::authorize_trip_update(&driver, "start_trip", Some(7), Some(8))
            .is_err()
    );
    assert!(AuthorizationService::authorize_trip_update(&driver, "start_trip", None, None).is_err());
    assert!(
        AuthorizationService::authorize_trip_update(
            &actor(Role::Dispatcher),
            "start_trip",
            Some(7),
            None
        )
        .is_ok()
    );
}

#[test]
fn test_unauthorized_error_names_action() {
    let err = AuthorizationService::authorize_dispatch(&actor(Role::Driver), "create_booking")
        .unwrap_err();
    match err {
        AuthError::Unauthorized { action, .. } => assert_eq!(action, "create_booking"),
        AuthError::AuthenticationFailed { .. } => panic!("Expected Unauthorized"),
    }
}

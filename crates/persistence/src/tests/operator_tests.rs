// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session persistence tests.

use crate::{Persistence, PersistenceError};

#[test]
fn test_create_operator_normalizes_login_and_hashes_password() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let operator_id = persistence
        .create_operator("  dispatch1 ", "Chidi Eze", "correct horse", "Dispatcher")
        .unwrap();

    let operator = persistence
        .get_operator_by_login("DISPATCH1")
        .unwrap()
        .unwrap();
    assert_eq!(operator.operator_id, operator_id);
    assert_eq!(operator.login_name, "DISPATCH1");
    assert_eq!(operator.role, "Dispatcher");
    assert_ne!(operator.password_hash, "correct horse");
    assert!(Persistence::verify_password("correct horse", &operator.password_hash).unwrap());
    assert!(!Persistence::verify_password("wrong", &operator.password_hash).unwrap());
}

#[test]
fn test_login_lookup_ignores_case() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_operator("Manager", "Bola Ade", "password", "Manager")
        .unwrap();

    assert!(persistence.get_operator_by_login("manager").unwrap().is_some());
    assert!(persistence.get_operator_by_login("nobody").unwrap().is_none());
}

#[test]
fn test_duplicate_login_is_a_conflict() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_operator("admin", "First", "password", "Admin")
        .unwrap();

    let result = persistence.create_operator("ADMIN", "Second", "password", "Admin");
    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
}

#[test]
fn test_disable_and_enable_operator() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let operator_id = persistence
        .create_operator("acct", "Ngozi", "password", "Accountant")
        .unwrap();
    persistence
        .create_session("token-1", operator_id, "2099-01-01 00:00:00")
        .unwrap();

    persistence.disable_operator(operator_id).unwrap();
    let operator = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(operator.is_disabled);
    assert!(operator.disabled_at.is_some());
    assert!(
        persistence.get_session_by_token("token-1").unwrap().is_none(),
        "disabling ends the operator's sessions"
    );

    persistence.enable_operator(operator_id).unwrap();
    let operator = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    assert!(!operator.is_disabled);
    assert!(operator.disabled_at.is_none());
}

#[test]
fn test_disable_missing_operator_fails() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let result = persistence.disable_operator(42);
    assert!(matches!(result, Err(PersistenceError::OperatorNotFound(_))));
}

#[test]
fn test_count_active_admins_skips_disabled() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let first = persistence
        .create_operator("admin1", "Admin One", "password", "Admin")
        .unwrap();
    persistence
        .create_operator("admin2", "Admin Two", "password", "Admin")
        .unwrap();
    persistence
        .create_operator("driver", "Driver", "password", "Driver")
        .unwrap();

    assert_eq!(persistence.count_operators().unwrap(), 3);
    assert_eq!(persistence.count_active_admins().unwrap(), 2);

    persistence.disable_operator(first).unwrap();
    assert_eq!(persistence.count_active_admins().unwrap(), 1);
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let operator_id = persistence
        .create_operator("ops", "Ops", "password", "Manager")
        .unwrap();

    let session_id = persistence
        .create_session("live-token", operator_id, "2099-01-01 00:00:00")
        .unwrap();
    let session = persistence
        .get_session_by_token("live-token")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.operator_id, operator_id);

    persistence.update_session_activity(session_id).unwrap();
    persistence.delete_session("live-token").unwrap();
    assert!(persistence.get_session_by_token("live-token").unwrap().is_none());
}

#[test]
fn test_delete_expired_sessions_keeps_live_ones() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let operator_id = persistence
        .create_operator("ops", "Ops", "password", "Manager")
        .unwrap();
    persistence
        .create_session("old", operator_id, "2000-01-01 00:00:00")
        .unwrap();
    persistence
        .create_session("new", operator_id, "2099-01-01 00:00:00")
        .unwrap();

    assert_eq!(persistence.delete_expired_sessions().unwrap(), 1);
    assert!(persistence.get_session_by_token("old").unwrap().is_none());
    assert!(persistence.get_session_by_token("new").unwrap().is_some());
}

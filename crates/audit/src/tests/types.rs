// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::JobId;

fn create_test_event(job_id: Option<JobId>) -> AuditEvent {
    let actor = Actor::with_operator(
        String::from("operator-7"),
        String::from("operator"),
        7,
        String::from("DISPATCH1"),
        String::from("Chidi Eze"),
    );
    let cause = Cause::new(String::from("req-1"), String::from("Dispatch desk"));
    let action = Action::new(
        String::from("AssignDriver"),
        Some(String::from("Assigned Musa Bello with KJA-123XY")),
    );
    let before = StateSnapshot::new(String::from("{\"status\":\"Approved\"}"));
    let after = StateSnapshot::new(String::from("{\"status\":\"Assigned\"}"));

    match job_id {
        Some(job_id) => AuditEvent::new(actor, cause, action, before, after, Some(3), job_id),
        None => AuditEvent::new_global(actor, cause, action, before, after),
    }
}

#[test]
fn test_actor_without_operator() {
    let actor = Actor::new(String::from("system"), String::from("system"));
    assert_eq!(actor.operator_id, None);
    assert_eq!(actor.display_name(), "system");
}

#[test]
fn test_actor_with_operator_uses_display_name() {
    let actor = Actor::with_operator(
        String::from("operator-1"),
        String::from("operator"),
        1,
        String::from("ADMIN"),
        String::from("Funke Adeyemi"),
    );
    assert_eq!(actor.operator_id, Some(1));
    assert_eq!(actor.display_name(), "Funke Adeyemi");
}

#[test]
fn test_booking_event_carries_job_id() {
    let job_id: JobId = "JOB-20261016-0001".parse().unwrap();
    let event = create_test_event(Some(job_id.clone()));

    assert!(!event.is_global());
    assert_eq!(event.job_id, Some(job_id));
    assert_eq!(event.booking_id, Some(3));
    assert_eq!(event.event_id, None);
}

#[test]
fn test_global_event_has_no_booking() {
    let event = create_test_event(None);
    assert!(event.is_global());
    assert_eq!(event.booking_id, None);
}

#[test]
fn test_with_event_id_and_for_booking() {
    let job_id: JobId = "JOB-20261016-0002".parse().unwrap();
    let event = create_test_event(Some(job_id))
        .for_booking(44)
        .with_event_id(99);
    assert_eq!(event.booking_id, Some(44));
    assert_eq!(event.event_id, Some(99));
}

#[test]
fn test_empty_snapshot() {
    assert_eq!(StateSnapshot::empty().data, "{}");
}

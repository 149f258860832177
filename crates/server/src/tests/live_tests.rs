// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_api::{Notification, Notifier, Recipient, Role};
use serde_json::json;
use std::sync::Arc;

use crate::live::{BroadcastNotifier, LiveEvent, LiveEventBroadcaster};

fn changed(job_id: &str) -> LiveEvent {
    LiveEvent::BookingChanged {
        job_id: job_id.to_string(),
    }
}

#[test]
fn test_broadcast_without_subscribers() {
    let broadcaster = LiveEventBroadcaster::new();
    assert_eq!(broadcaster.broadcast(&changed("JOB-20260314-0001")), 0);
}

#[tokio::test]
async fn test_every_subscriber_receives_event() {
    let broadcaster = LiveEventBroadcaster::new();
    let mut first = broadcaster.subscribe();
    let mut second = broadcaster.subscribe();

    let sent = broadcaster.broadcast(&LiveEvent::resource("vehicles"));

    assert_eq!(sent, 2);
    assert_eq!(first.recv().await.unwrap(), LiveEvent::resource("vehicles"));
    assert_eq!(second.recv().await.unwrap(), LiveEvent::resource("vehicles"));
}

#[test]
fn test_notification_visibility() {
    let event = LiveEvent::Notification {
        recipients: vec![Recipient::Operator(7), Recipient::Role(Role::Accountant)],
        title: String::from("Payment received"),
        body: String::from("JOB-20260314-0001 was paid"),
        job_id: Some(String::from("JOB-20260314-0001")),
    };

    assert!(event.is_visible_to(7, Role::Driver));
    assert!(event.is_visible_to(3, Role::Accountant));
    assert!(!event.is_visible_to(3, Role::Dispatcher));
    assert!(changed("JOB-20260314-0001").is_visible_to(3, Role::Driver));
}

#[tokio::test]
async fn test_notifier_emits_notification_event() {
    let broadcaster = Arc::new(LiveEventBroadcaster::new());
    let mut rx = broadcaster.subscribe();
    let notifier = BroadcastNotifier::new(Arc::clone(&broadcaster));

    let notification = Notification::new(
        vec![Recipient::Role(Role::Manager)],
        "Price offer",
        "A new offer awaits approval",
    )
    .for_job("JOB-20260314-0002");
    notifier.notify(&notification).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        LiveEvent::Notification {
            recipients: vec![Recipient::Role(Role::Manager)],
            title: String::from("Price offer"),
            body: String::from("A new offer awaits approval"),
            job_id: Some(String::from("JOB-20260314-0002")),
        }
    );
}

#[test]
fn test_notifier_without_subscribers_is_ok() {
    let notifier = BroadcastNotifier::new(Arc::new(LiveEventBroadcaster::new()));
    let notification = Notification::new(vec![Recipient::Operator(1)], "Hello", "Nobody home");
    assert!(notifier.notify(&notification).is_ok());
}

#[test]
fn test_event_wire_format() {
    let value = serde_json::to_value(changed("JOB-20260314-0001")).unwrap();
    assert_eq!(
        value,
        json!({ "type": "booking_changed", "job_id": "JOB-20260314-0001" })
    );

    let value = serde_json::to_value(LiveEvent::resource("prepaid_accounts")).unwrap();
    assert_eq!(
        value,
        json!({ "type": "resource_changed", "resource": "prepaid_accounts" })
    );
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fire-and-forget notifications to operators.
//!
//! Handlers describe who should hear about a change; delivery belongs to
//! whatever [`Notifier`] the server plugs in. A failed delivery is logged
//! and never fails the handler that triggered it.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::Role;

/// Who a notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// One operator, by id.
    Operator(i64),
    /// Every operator holding a role.
    Role(Role),
}

/// A message for one or more recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Who should see it.
    pub recipients: Vec<Recipient>,
    /// Short headline.
    pub title: String,
    /// Message text.
    pub body: String,
    /// The job this concerns, if any.
    pub job_id: Option<String>,
}

impl Notification {
    /// Creates a notification that is not tied to a job.
    #[must_use]
    pub fn new(recipients: Vec<Recipient>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipients,
            title: title.into(),
            body: body.into(),
            job_id: None,
        }
    }

    /// Attaches the job this notification is about.
    #[must_use]
    pub fn for_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }
}

/// Why a notification was not delivered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// Nobody is listening.
    #[error("No notification subscribers")]
    NoSubscribers,
    /// The delivery channel refused the message.
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error when the notification could not be handed off.
    fn notify(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// A notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        debug!(title = %notification.title, "Notification dropped");
        Ok(())
    }
}

/// Sends a notification, logging and swallowing any failure.
pub fn notify_best_effort(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(e) = notifier.notify(notification) {
        warn!(
            title = %notification.title,
            job_id = ?notification.job_id,
            error = %e,
            "Notification not delivered"
        );
    }
}

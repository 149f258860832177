// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live updates for the back-office UI.
//!
//! Events are revalidation hints and in-app notifications. They carry no
//! authoritative state; clients refetch over HTTP when a hint arrives.
//! Nothing is executed over the socket and nothing here is written to the
//! job timeline.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::{IntoResponse, Response},
};
use fleetdesk_api::{
    AuthenticationService, Notification, NotificationError, Notifier, Recipient, Role,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;
use crate::http::HttpError;

/// Events buffered per subscriber before the oldest are dropped.
const EVENT_BUFFER_SIZE: usize = 256;

/// What the UI hears about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A booking (or something hanging off it) changed.
    BookingChanged {
        /// The booking's job id.
        job_id: String,
    },
    /// A list outside bookings changed, e.g. `vehicles` or `prepaid_accounts`.
    ResourceChanged {
        /// Which list to refetch.
        resource: String,
    },
    /// An in-app notification.
    Notification {
        /// Who it is for; other sockets never see it.
        recipients: Vec<Recipient>,
        /// Headline.
        title: String,
        /// Text.
        body: String,
        /// Related job, if any.
        job_id: Option<String>,
    },
    /// Sent once when a socket opens.
    Connected {
        /// Server time (ISO 8601).
        timestamp: String,
    },
}

impl LiveEvent {
    /// Shorthand for a [`LiveEvent::ResourceChanged`].
    pub fn resource(resource: &str) -> Self {
        Self::ResourceChanged {
            resource: resource.to_string(),
        }
    }

    /// Whether the operator on a socket should receive this event.
    #[must_use]
    pub fn is_visible_to(&self, operator_id: i64, role: Role) -> bool {
        match self {
            Self::Notification { recipients, .. } => recipients.iter().any(|r| match r {
                Recipient::Operator(id) => *id == operator_id,
                Recipient::Role(r) => *r == role,
            }),
            _ => true,
        }
    }
}

/// Fan-out of live events to every open socket.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Sends an event to every subscriber and returns how many there were.
    pub fn broadcast(&self, event: &LiveEvent) -> usize {
        self.tx.send(event.clone()).map_or_else(
            |_| {
                debug!(?event, "No receivers for live event");
                0
            },
            |count| {
                debug!(?event, receivers = count, "Broadcast live event");
                count
            },
        )
    }

    /// Subscribes to events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers handler notifications as [`LiveEvent::Notification`]s.
#[derive(Clone)]
pub struct BroadcastNotifier {
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl BroadcastNotifier {
    /// Wraps a broadcaster.
    #[must_use]
    pub const fn new(broadcaster: Arc<LiveEventBroadcaster>) -> Self {
        Self { broadcaster }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        let event = LiveEvent::Notification {
            recipients: notification.recipients.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            job_id: notification.job_id.clone(),
        };
        // Nobody online is normal; the notification is simply missed.
        self.broadcaster.broadcast(&event);
        Ok(())
    }
}

/// Browsers cannot set headers on a websocket upgrade, so the session
/// token travels in the query string.
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// Session token.
    pub token: String,
}

/// `GET /live`: upgrades to a websocket that streams [`LiveEvent`]s.
///
/// # Errors
///
/// Returns 401 if the token does not name a valid session.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<LiveQuery>,
) -> Response {
    let mut persistence = app_state.persistence.lock().await;
    let validated = AuthenticationService::validate_session(&mut persistence, &query.token);
    drop(persistence);

    match validated {
        Ok((actor, operator)) => {
            let broadcaster = Arc::clone(&app_state.live);
            let operator_id = operator.operator_id;
            let role = actor.role;
            ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, operator_id, role))
        }
        Err(e) => {
            warn!(error = %e, "Live stream refused");
            HttpError::from(fleetdesk_api::ApiError::from(e)).into_response()
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    broadcaster: Arc<LiveEventBroadcaster>,
    operator_id: i64,
    role: Role,
) {
    info!(operator_id, %role, "Client connected to live stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = broadcaster.subscribe();

    let connected = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };
    if let Ok(json) = serde_json::to_string(&connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live stream subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            if !event.is_visible_to(operator_id, role) {
                continue;
            }
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!(?e, "Failed to serialize live event"),
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Ignoring message sent on the live stream");
                }
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "Live stream receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(operator_id, "Client disconnected from live stream");
}

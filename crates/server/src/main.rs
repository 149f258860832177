// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod http;
mod live;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::{Router, routing::get};
use clap::Parser;
use fleetdesk_domain::{DEFAULT_TIMEZONE, Tz, parse_timezone};
use fleetdesk_persistence::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::live::{BroadcastNotifier, LiveEvent, LiveEventBroadcaster, live_events_handler};

/// Fleetdesk Server - HTTP server for the Fleetdesk back office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an in-memory database.
    #[arg(short, long, env = "FLEETDESK_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[cfg(feature = "mysql")]
    #[arg(long, env = "FLEETDESK_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind to
    #[arg(short, long, env = "FLEETDESK_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "FLEETDESK_PORT", default_value_t = 3000)]
    port: u16,

    /// IANA timezone used for job ids, date buckets and maintenance dates
    #[arg(short, long, env = "FLEETDESK_TIMEZONE", default_value = "Africa/Lagos")]
    timezone: String,
}

/// State shared by every route.
#[derive(Clone)]
pub struct AppState {
    /// The database, one writer at a time.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Live event fan-out.
    pub live: Arc<LiveEventBroadcaster>,
    /// Delivers handler notifications over the live stream.
    pub notifier: BroadcastNotifier,
    /// The business timezone.
    pub timezone: Tz,
}

impl AppState {
    /// Builds state around an open database.
    #[must_use]
    pub fn new(persistence: Persistence, timezone: Tz) -> Self {
        let live = Arc::new(LiveEventBroadcaster::new());
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            notifier: BroadcastNotifier::new(Arc::clone(&live)),
            live,
            timezone,
        }
    }

    /// Tells connected clients to refetch something.
    pub fn publish(&self, event: &LiveEvent) {
        self.live.broadcast(event);
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::auth::router())
        .merge(routes::bookings::router())
        .merge(routes::clients::router())
        .merge(routes::fleet::router())
        .merge(routes::ledger::router())
        .merge(routes::maintenance::router())
        .merge(routes::procurement::router())
        .merge(routes::reports::router())
        .merge(routes::workdrive::router())
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

fn open_persistence(args: &Args) -> Result<Persistence, Box<dyn std::error::Error>> {
    #[cfg(feature = "mysql")]
    {
        if let Some(url) = &args.mysql_url {
            info!("Using MySQL/MariaDB database");
            return Ok(Persistence::new_with_mysql(url)?);
        }
    }

    if let Some(db_path) = &args.database {
        info!(path = %db_path, "Using file-based database");
        Ok(Persistence::new_with_file(db_path)?)
    } else {
        info!("Using in-memory database");
        Ok(Persistence::new_in_memory()?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fleetdesk server");

    let timezone: Tz = if args.timezone.trim().is_empty() {
        DEFAULT_TIMEZONE
    } else {
        parse_timezone(args.timezone.trim())?
    };
    info!(%timezone, "Business timezone");

    let persistence = open_persistence(&args)?;
    let app: Router = build_router(AppState::new(persistence, timezone));

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

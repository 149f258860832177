// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_domain::Money;

/// A command represents operator intent against one booking, as data only.
///
/// Commands are the only way to change a booking after intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open or continue price negotiation.
    Negotiate {
        /// The price on the table.
        proposed: Money,
    },
    /// Agree a price.
    Approve {
        /// The agreed price.
        agreed: Money,
    },
    /// Put a driver and their vehicle on the job.
    Assign {
        /// The driver's id.
        driver_id: i64,
        /// The vehicle pre-assigned to the driver.
        vehicle_id: i64,
        /// The driver's name, for the timeline.
        driver_name: String,
        /// The vehicle's plate number, for the timeline.
        vehicle_plate: String,
    },
    /// The driver has collected the cargo.
    StartTrip,
    /// The cargo is on the road.
    MarkInTransit,
    /// Delivered.
    Complete,
    /// Paperwork settled.
    Close,
    /// Abandon the booking.
    Cancel {
        /// Why the booking was cancelled.
        reason: String,
    },
    /// Record client payment.
    MarkPaid,
    /// Add trip spend to the booking's running totals.
    RecordExpenses {
        /// Fuel spend.
        fuel: Money,
        /// Tolls and tickets.
        ticketing: Money,
        /// Driver allowance.
        allowance: Money,
    },
}

impl Command {
    /// The timeline action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Negotiate { .. } => "Negotiate",
            Self::Approve { .. } => "ApproveBooking",
            Self::Assign { .. } => "AssignDriver",
            Self::StartTrip => "StartTrip",
            Self::MarkInTransit => "MarkInTransit",
            Self::Complete => "CompleteBooking",
            Self::Close => "CloseBooking",
            Self::Cancel { .. } => "CancelBooking",
            Self::MarkPaid => "MarkPaid",
            Self::RecordExpenses { .. } => "RecordExpenses",
        }
    }
}

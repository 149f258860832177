// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The lifecycle status of a booking.
///
/// String forms match what operators see, including the spaces in
/// `In Progress` and `In Transit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BookingStatus {
    /// Freshly created from intake.
    #[default]
    Open,
    /// Price is being negotiated with the client.
    Negotiation,
    /// Price agreed.
    Approved,
    /// A driver and vehicle are on the job.
    Assigned,
    /// The driver has started the trip.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Cargo is on the road.
    #[serde(rename = "In Transit")]
    InTransit,
    /// Delivered.
    Completed,
    /// Paperwork and payment settled.
    Closed,
    /// Abandoned before the trip started.
    Cancelled,
}

impl BookingStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Open,
        Self::Negotiation,
        Self::Approved,
        Self::Assigned,
        Self::InProgress,
        Self::InTransit,
        Self::Completed,
        Self::Closed,
        Self::Cancelled,
    ];

    /// Returns the display and storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Negotiation => "Negotiation",
            Self::Approved => "Approved",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::InTransit => "In Transit",
            Self::Completed => "Completed",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Checks if a booking in this status may move to `target`.
    ///
    /// `Assigned -> Assigned` is allowed so a job can be reassigned.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Open,
                Self::Negotiation | Self::Approved | Self::Assigned | Self::Cancelled
            ) | (
                Self::Negotiation,
                Self::Approved | Self::Assigned | Self::Cancelled
            ) | (
                Self::Approved,
                Self::Negotiation | Self::Assigned | Self::Cancelled
            ) | (
                Self::Assigned,
                Self::Assigned | Self::InProgress | Self::Cancelled
            ) | (Self::InProgress, Self::InTransit | Self::Completed)
                | (Self::InTransit, Self::Completed)
                | (Self::Completed, Self::Closed)
        )
    }

    /// Returns true for `Closed` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Returns true once the trip has been delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Completed | Self::Closed)
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidBookingStatus(s.to_string()))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the client has paid for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    /// Not yet paid.
    #[default]
    Unpaid,
    /// Paid in full.
    Paid,
}

impl PaymentStatus {
    /// Returns the storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of spend a prepaid account funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Diesel and petrol.
    Fuel,
    /// Tolls, park tickets and levies.
    Ticketing,
    /// Driver trip allowance.
    Allowance,
}

impl ExpenseCategory {
    /// All categories.
    pub const ALL: [Self; 3] = [Self::Fuel, Self::Ticketing, Self::Allowance];

    /// Returns the storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fuel => "Fuel",
            Self::Ticketing => "Ticketing",
            Self::Allowance => "Allowance",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fuel" => Ok(Self::Fuel),
            "Ticketing" => Ok(Self::Ticketing),
            "Allowance" => Ok(Self::Allowance),
            _ => Err(DomainError::InvalidExpenseCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VehicleStatus {
    /// Ready for work.
    #[default]
    Available,
    /// On a job.
    Assigned,
    /// In the workshop.
    #[serde(rename = "In Maintenance")]
    InMaintenance,
    /// Out of service permanently.
    Retired,
}

impl VehicleStatus {
    /// Returns the storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::InMaintenance => "In Maintenance",
            Self::Retired => "Retired",
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Assigned" => Ok(Self::Assigned),
            "In Maintenance" => Ok(Self::InMaintenance),
            "Retired" => Ok(Self::Retired),
            _ => Err(DomainError::InvalidVehicleStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a maintenance job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaintenanceStatus {
    /// Booked with the workshop.
    #[default]
    Scheduled,
    /// Vehicle is in the workshop.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Work done.
    Completed,
}

impl MaintenanceStatus {
    /// Returns the storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidMaintenanceStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of a vehicle procurement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProcurementStatus {
    /// Raised, awaiting a decision.
    #[default]
    Requested,
    /// Approved for purchase.
    Approved,
    /// Turned down.
    Rejected,
    /// Purchase order placed.
    Ordered,
    /// Received.
    Delivered,
}

impl ProcurementStatus {
    /// Returns the storage string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Ordered => "Ordered",
            Self::Delivered => "Delivered",
        }
    }

    /// Checks if a request in this status may move to `target`.
    ///
    /// Valid transitions are:
    /// - Requested → Approved | Rejected
    /// - Approved → Ordered | Rejected
    /// - Ordered → Delivered
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Requested, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Ordered | Self::Rejected)
                | (Self::Ordered, Self::Delivered)
        )
    }

    /// Returns true for decisions reserved to managers.
    #[must_use]
    pub const fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for ProcurementStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Requested" => Ok(Self::Requested),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "Ordered" => Ok(Self::Ordered),
            "Delivered" => Ok(Self::Delivered),
            _ => Err(DomainError::InvalidProcurementStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProcurementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required text field was empty.
    EmptyField {
        /// The field name.
        field: &'static str,
    },
    /// A monetary amount could not be parsed.
    InvalidAmount(String),
    /// A monetary amount must be strictly positive.
    NonPositiveAmount {
        /// The field name.
        field: &'static str,
        /// The offending amount in kobo.
        kobo: i64,
    },
    /// A monetary amount must not be negative.
    NegativeAmount {
        /// The field name.
        field: &'static str,
        /// The offending amount in kobo.
        kobo: i64,
    },
    /// Arithmetic on an amount overflowed.
    AmountOverflow,
    /// A phone number has no digits or contains invalid characters.
    InvalidPhoneNumber(String),
    /// An email address has no `@`.
    InvalidEmail(String),
    /// A job identifier is malformed.
    InvalidJobId(String),
    /// A URL is not an absolute http(s) URL.
    InvalidUrl(String),
    /// A date string could not be parsed.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// An unknown booking status string.
    InvalidBookingStatus(String),
    /// An unknown payment status string.
    InvalidPaymentStatus(String),
    /// An unknown expense category string.
    InvalidExpenseCategory(String),
    /// An unknown vehicle status string.
    InvalidVehicleStatus(String),
    /// An unknown maintenance status string.
    InvalidMaintenanceStatus(String),
    /// An unknown procurement status string.
    InvalidProcurementStatus(String),
    /// An unknown report bucket string.
    InvalidDateBucket(String),
    /// A booking cannot move between the two statuses.
    InvalidBookingTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A procurement cannot move between the two statuses.
    InvalidProcurementTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A maintenance interval must be at least one day.
    InvalidInterval(i32),
    /// A quantity must be at least one.
    InvalidQuantity(i32),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} cannot be empty"),
            Self::InvalidAmount(raw) => write!(f, "Invalid amount: '{raw}'"),
            Self::NonPositiveAmount { field, kobo } => {
                write!(f, "{field} must be greater than zero (got {kobo} kobo)")
            }
            Self::NegativeAmount { field, kobo } => {
                write!(f, "{field} cannot be negative (got {kobo} kobo)")
            }
            Self::AmountOverflow => write!(f, "Amount arithmetic overflowed"),
            Self::InvalidPhoneNumber(raw) => write!(f, "Invalid phone number: '{raw}'"),
            Self::InvalidEmail(raw) => write!(f, "Invalid email address: '{raw}'"),
            Self::InvalidJobId(raw) => {
                write!(f, "Invalid job id '{raw}'. Expected JOB-YYYYMMDD-NNNN")
            }
            Self::InvalidUrl(raw) => write!(f, "Invalid URL: '{raw}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidBookingStatus(raw) => write!(f, "Invalid booking status: '{raw}'"),
            Self::InvalidPaymentStatus(raw) => write!(f, "Invalid payment status: '{raw}'"),
            Self::InvalidExpenseCategory(raw) => {
                write!(f, "Invalid expense category: '{raw}'")
            }
            Self::InvalidVehicleStatus(raw) => write!(f, "Invalid vehicle status: '{raw}'"),
            Self::InvalidMaintenanceStatus(raw) => {
                write!(f, "Invalid maintenance status: '{raw}'")
            }
            Self::InvalidProcurementStatus(raw) => {
                write!(f, "Invalid procurement status: '{raw}'")
            }
            Self::InvalidDateBucket(raw) => write!(f, "Invalid date bucket: '{raw}'"),
            Self::InvalidBookingTransition { from, to } => {
                write!(f, "Booking cannot move from '{from}' to '{to}'")
            }
            Self::InvalidProcurementTransition { from, to } => {
                write!(f, "Procurement cannot move from '{from}' to '{to}'")
            }
            Self::InvalidInterval(days) => {
                write!(f, "Maintenance interval must be at least 1 day (got {days})")
            }
            Self::InvalidQuantity(quantity) => {
                write!(f, "Quantity must be at least 1 (got {quantity})")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use fleetdesk::CoreError;
use fleetdesk_domain::DomainError;
use fleetdesk_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and form
/// the contract the server maps onto HTTP statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not allow the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A business rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// Field-level problems become `InvalidInput`; lifecycle rules become
/// `DomainRuleViolation`.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::EmptyField { field }
        | DomainError::NonPositiveAmount { field, .. }
        | DomainError::NegativeAmount { field, .. } => invalid(field, &err),
        DomainError::InvalidAmount(_) | DomainError::AmountOverflow => invalid("amount", &err),
        DomainError::InvalidPhoneNumber(_) => invalid("client_phone", &err),
        DomainError::InvalidEmail(_) => invalid("client_email", &err),
        DomainError::InvalidJobId(_) => invalid("job_id", &err),
        DomainError::InvalidUrl(_) => invalid("file_url", &err),
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            invalid("date", &err)
        }
        DomainError::InvalidBookingStatus(_)
        | DomainError::InvalidPaymentStatus(_)
        | DomainError::InvalidVehicleStatus(_)
        | DomainError::InvalidMaintenanceStatus(_)
        | DomainError::InvalidProcurementStatus(_) => invalid("status", &err),
        DomainError::InvalidExpenseCategory(_) => invalid("category", &err),
        DomainError::InvalidDateBucket(_) => invalid("bucket", &err),
        DomainError::InvalidInterval(_) => invalid("interval_days", &err),
        DomainError::InvalidQuantity(_) => invalid("quantity", &err),
        DomainError::InvalidBookingTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("booking_transition"),
            message: err.to_string(),
        },
        DomainError::InvalidProcurementTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("procurement_transition"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Snapshot(msg) => ApiError::Internal {
            message: format!("Failed to snapshot booking: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what the caller was looking up, for not-found
/// messages.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::NotFound(message)
        | PersistenceError::BookingNotFound(message)
        | PersistenceError::OperatorNotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from(resource_type),
            message,
        },
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Timeline event"),
            message: format!("Event {event_id} does not exist"),
        },
        PersistenceError::Conflict(message) => ApiError::DomainRuleViolation {
            rule: String::from("unique"),
            message,
        },
        PersistenceError::SequenceExhausted(date) => ApiError::DomainRuleViolation {
            rule: String::from("job_id_sequence"),
            message: format!("No job ids left for {date}"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

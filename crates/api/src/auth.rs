// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use fleetdesk_audit::Actor;
use fleetdesk_persistence::{OperatorData, Persistence, SessionData};
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, info};

use crate::error::AuthError;

/// Operator roles.
///
/// Roles belong to operators (people logged in to the back office), not to
/// clients or the drivers' records in the fleet tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// Full control, including operator accounts.
    Admin,
    /// Runs the operation: may delete bookings and decide procurement.
    Manager,
    /// Takes bookings and puts drivers on them.
    Dispatcher,
    /// Keeps the prepaid ledger and records payments.
    Accountant,
    /// Drives; may only move trips they are assigned to.
    Driver,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Manager,
        Self::Dispatcher,
        Self::Accountant,
        Self::Driver,
    ];

    /// The stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Dispatcher => "Dispatcher",
            Self::Accountant => "Accountant",
            Self::Driver => "Driver",
        }
    }

    /// Parses a stored role.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for an unknown role.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == raw)
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {raw}"),
            })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated operator and their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's login name.
    pub id: String,
    /// The operator's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Builds the timeline actor for this operator.
    #[must_use]
    pub fn to_audit_actor(&self, operator: &OperatorData) -> Actor {
        Actor::with_operator(
            self.id.clone(),
            self.role.as_str().to_lowercase(),
            operator.operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
        )
    }
}

/// Role-based access checks.
///
/// Each check names the action it guards so a refusal says what was
/// attempted and which roles could have done it.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(
        actor: &AuthenticatedActor,
        action: &str,
        allowed: &[Role],
    ) -> Result<(), AuthError> {
        if allowed.contains(&actor.role) {
            return Ok(());
        }
        let required_role = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        debug!(actor = %actor.id, role = %actor.role, action, "Refused by role check");
        Err(AuthError::Unauthorized {
            action: String::from(action),
            required_role,
        })
    }

    /// Operator accounts: Admin only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_manage_operators(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "manage_operators", &[Role::Admin])
    }

    /// Vehicles and drivers: Admin or Manager.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_manage_fleet(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "manage_fleet", &[Role::Admin, Role::Manager])
    }

    /// Intake, pricing, assignment, cancellation and closing.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Accountant and Driver.
    pub fn authorize_dispatch(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Admin, Role::Manager, Role::Dispatcher])
    }

    /// Trip progress updates.
    ///
    /// Drivers may only update trips assigned to their own driver record;
    /// `operator_driver_id` is that record's id, if the operator has one.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Accountant, or for a Driver not on the trip.
    pub fn authorize_trip_update(
        actor: &AuthenticatedActor,
        action: &str,
        booking_driver_id: Option<i64>,
        operator_driver_id: Option<i64>,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Driver {
            return match (booking_driver_id, operator_driver_id) {
                (Some(assigned), Some(own)) if assigned == own => Ok(()),
                _ => Err(AuthError::Unauthorized {
                    action: String::from(action),
                    required_role: String::from("the assigned Driver"),
                }),
            };
        }
        Self::require(actor, action, &[Role::Admin, Role::Manager, Role::Dispatcher])
    }

    /// Recording client payment.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Dispatcher and Driver.
    pub fn authorize_record_payment(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            "mark_paid",
            &[Role::Admin, Role::Manager, Role::Accountant],
        )
    }

    /// Prepaid accounts, top-ups and reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Dispatcher and Driver.
    pub fn authorize_manage_ledger(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Admin, Role::Manager, Role::Accountant])
    }

    /// Charging an expense to a prepaid account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Driver.
    pub fn authorize_record_expense(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            "record_expense",
            &[Role::Admin, Role::Manager, Role::Dispatcher, Role::Accountant],
        )
    }

    /// Booking deletion: Admin or Manager.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_delete_booking(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "delete_booking", &[Role::Admin, Role::Manager])
    }

    /// Maintenance logs and schedules.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Accountant and Driver.
    pub fn authorize_manage_maintenance(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Admin, Role::Manager, Role::Dispatcher])
    }

    /// Approving or rejecting procurement requests: Admin or Manager.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_decide_procurement(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            "decide_procurement",
            &[Role::Admin, Role::Manager],
        )
    }

    /// Raising and progressing procurement requests.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Accountant and Driver.
    pub fn authorize_request_procurement(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(actor, action, &[Role::Admin, Role::Manager, Role::Dispatcher])
    }

    /// Deleting procurement requests: Admin or Manager.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for any other role.
    pub fn authorize_delete_procurement(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "delete_procurement", &[Role::Admin, Role::Manager])
    }

    /// `WorkDrive` folders and documents. Drivers are read-only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Driver.
    pub fn authorize_manage_documents(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        Self::require(
            actor,
            action,
            &[Role::Admin, Role::Manager, Role::Dispatcher, Role::Accountant],
        )
    }

    /// Dashboard and expense exports.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for Dispatcher and Driver.
    pub fn authorize_view_reports(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            "view_reports",
            &[Role::Admin, Role::Manager, Role::Accountant],
        )
    }
}

/// Session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// How long a session lasts.
    pub const SESSION_LIFETIME: Duration = Duration::days(30);

    /// Checks credentials and opens a session.
    ///
    /// Unknown login names and wrong passwords produce the same message.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the operator is
    /// disabled, or the session cannot be written.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        let bad_credentials = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        };

        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(bad_credentials)?;

        let password_ok = Persistence::verify_password(password, &operator.password_hash)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to verify password: {e}"),
            })?;
        if !password_ok {
            return Err(bad_credentials());
        }

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role = Role::parse(&operator.role)?;
        let session_token = Self::generate_session_token();
        let expires_at = format_session_time(OffsetDateTime::now_utc() + Self::SESSION_LIFETIME)?;

        persistence
            .create_session(&session_token, operator.operator_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;
        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(operator_id = operator.operator_id, role = %role, "Operator logged in");
        let actor = AuthenticatedActor::new(operator.login_name.clone(), role);
        Ok((session_token, actor, operator))
    }

    /// Resolves a session token to its operator.
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or the operator
    /// has been disabled since logging in.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if parse_session_time(&session.expires_at)? < OffsetDateTime::now_utc() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role = Role::parse(&operator.role)?;
        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;

        Ok((
            AuthenticatedActor::new(operator.login_name.clone(), role),
            operator,
        ))
    }

    /// Ends a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    fn generate_session_token() -> String {
        format!(
            "fd_{:016x}{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }
}

/// Formats a UTC instant the way session rows store it.
fn format_session_time(instant: OffsetDateTime) -> Result<String, AuthError> {
    instant
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format session expiry: {e}"),
        })
}

fn parse_session_time(raw: &str) -> Result<OffsetDateTime, AuthError> {
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .map(PrimitiveDateTime::assume_utc)
    .map_err(|e| AuthError::AuthenticationFailed {
        reason: format!("Failed to parse session expiry: {e}"),
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator accounts and sessions.

use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_persistence::{OperatorData, Persistence, SessionData};
use tracing::{info, warn};

use super::{GlobalEntry, internal, not_found};
use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::capabilities::{compute_global_capabilities, compute_operator_capabilities};
use crate::error::ApiError;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    BootstrapStatusResponse, CreateFirstAdminRequest, CreateOperatorRequest,
    CreateOperatorResponse, ListOperatorsResponse, LoginRequest, LoginResponse, OperatorInfo,
    OperatorStatusRequest, OperatorStatusResponse, WhoAmIResponse,
};

/// Reports whether the system is waiting for its first admin.
///
/// # Errors
///
/// Returns an error if the operator count cannot be read.
pub fn check_bootstrap_status(
    persistence: &mut Persistence,
) -> Result<BootstrapStatusResponse, ApiError> {
    let count: i64 = persistence
        .count_operators()
        .map_err(internal("Failed to count operators"))?;
    Ok(BootstrapStatusResponse {
        is_bootstrap_mode: count == 0,
    })
}

/// Creates the first Admin operator.
///
/// Only allowed while no operators exist. The new admin is recorded as
/// the actor of their own creation.
///
/// # Errors
///
/// Returns an error if:
/// - Any operator already exists
/// - The password breaks the password policy
/// - Database operations fail
pub fn bootstrap_first_admin(
    persistence: &mut Persistence,
    request: CreateFirstAdminRequest,
    cause: Cause,
) -> Result<CreateOperatorResponse, ApiError> {
    if !check_bootstrap_status(persistence)?.is_bootstrap_mode {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("bootstrap_once"),
            message: String::from("The first admin has already been created"),
        });
    }

    let login_name = super::require_text("login_name", &request.login_name)?;
    let display_name = super::require_text("display_name", &request.display_name)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &login_name,
        &display_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &login_name,
            &display_name,
            &request.password,
            Role::Admin.as_str(),
        )
        .map_err(internal("Failed to create operator"))?;
    let created: OperatorData = persistence
        .get_operator_by_id(operator_id)
        .map_err(internal("Failed to load operator"))?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Operator {operator_id} missing after creation"),
        })?;

    let actor = Actor::with_operator(
        created.login_name.clone(),
        String::from("admin"),
        created.operator_id,
        created.login_name.clone(),
        created.display_name.clone(),
    );
    let event = AuditEvent::new_global(
        actor,
        cause,
        Action::new(
            String::from("BootstrapFirstAdmin"),
            Some(format!("Created first admin {}", created.login_name)),
        ),
        StateSnapshot::empty(),
        super::snapshot(&created)?,
    );
    persistence
        .persist_audit_event(&event)
        .map_err(internal("Failed to persist audit event"))?;

    info!(operator_id, login_name = %created.login_name, "First admin created");
    Ok(CreateOperatorResponse {
        operator_id,
        login_name: created.login_name,
        display_name: created.display_name,
        role: created.role,
    })
}

/// Authenticates an operator and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong, the operator is
/// disabled, or the session cannot be written.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, operator): (String, AuthenticatedActor, OperatorData) =
        AuthenticationService::login(persistence, &request.login_name, &request.password)?;

    let session: SessionData = persistence
        .get_session_by_token(&session_token)
        .map_err(internal("Failed to retrieve session"))?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?;

    Ok(LoginResponse {
        session_token,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: operator.role,
        expires_at: session.expires_at,
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the logged-in operator with their capabilities.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor, operator: &OperatorData) -> WhoAmIResponse {
    WhoAmIResponse {
        operator_id: operator.operator_id,
        login_name: operator.login_name.clone(),
        display_name: operator.display_name.clone(),
        role: operator.role.clone(),
        is_disabled: operator.is_disabled,
        capabilities: compute_global_capabilities(actor, operator),
    }
}

/// Creates an operator.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The role is unknown
/// - The password breaks the password policy
/// - The login name is taken
pub fn create_operator(
    persistence: &mut Persistence,
    request: CreateOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreateOperatorResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let role: Role = Role::parse(request.role.trim()).map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!(
            "Invalid role '{}'. Must be one of: Admin, Manager, Dispatcher, Accountant, Driver",
            request.role
        ),
    })?;
    let login_name = super::require_text("login_name", &request.login_name)?;
    let display_name = super::require_text("display_name", &request.display_name)?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &login_name,
        &display_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(&login_name, &display_name, &request.password, role.as_str())
        .map_err(not_found("Operator"))?;
    let stored_login = login_name.to_uppercase();

    GlobalEntry {
        action: "CreateOperator",
        details: format!("Created operator {stored_login} ({display_name}) with role {role}"),
        before: StateSnapshot::empty(),
        after: StateSnapshot::new(format!(
            "{{\"operator_id\":{operator_id},\"login_name\":\"{stored_login}\",\"role\":\"{role}\"}}"
        )),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreateOperatorResponse {
        operator_id,
        login_name: stored_login,
        display_name,
        role: String::from(role.as_str()),
    })
}

/// Lists every operator with what the caller may do to each.
///
/// Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the query fails.
pub fn list_operators(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    actor_operator: &OperatorData,
) -> Result<ListOperatorsResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let operators: Vec<OperatorData> = persistence
        .list_operators()
        .map_err(internal("Failed to list operators"))?;

    let operators = operators
        .into_iter()
        .map(|op| {
            let capabilities = compute_operator_capabilities(
                authenticated_actor,
                actor_operator,
                &op,
                persistence,
            )
            .map_err(|message| ApiError::Internal { message })?;
            Ok(OperatorInfo {
                operator_id: op.operator_id,
                login_name: op.login_name,
                display_name: op.display_name,
                role: op.role,
                is_disabled: op.is_disabled,
                created_at: op.created_at,
                last_login_at: op.last_login_at,
                capabilities,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(ListOperatorsResponse { operators })
}

fn load_operator(persistence: &mut Persistence, operator_id: i64) -> Result<OperatorData, ApiError> {
    persistence
        .get_operator_by_id(operator_id)
        .map_err(internal("Failed to load operator"))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Operator"),
            message: format!("Operator {operator_id} does not exist"),
        })
}

/// Disables an operator and ends their sessions.
///
/// The last active Admin cannot be disabled.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The operator does not exist
/// - The operator is the last active Admin
pub fn disable_operator(
    persistence: &mut Persistence,
    request: OperatorStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<OperatorStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;
    let target = load_operator(persistence, request.operator_id)?;

    if target.role == Role::Admin.as_str() && !target.is_disabled {
        let active_admins: i64 = persistence
            .count_active_admins()
            .map_err(internal("Failed to count active admins"))?;
        if active_admins <= 1 {
            warn!(operator_id = target.operator_id, "Refused to disable the last active admin");
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("last_active_admin"),
                message: String::from("Cannot disable the last active admin"),
            });
        }
    }

    persistence
        .disable_operator(target.operator_id)
        .map_err(not_found("Operator"))?;

    GlobalEntry {
        action: "DisableOperator",
        details: format!("Disabled operator {}", target.login_name),
        before: super::snapshot(&target)?,
        after: StateSnapshot::new(format!(
            "{{\"operator_id\":{},\"is_disabled\":true}}",
            target.operator_id
        )),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(OperatorStatusResponse {
        operator_id: target.operator_id,
        is_disabled: true,
        message: format!("Operator {} disabled", target.login_name),
    })
}

/// Re-enables a disabled operator.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the operator does not
/// exist.
pub fn enable_operator(
    persistence: &mut Persistence,
    request: OperatorStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<OperatorStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;
    let target = load_operator(persistence, request.operator_id)?;

    persistence
        .enable_operator(target.operator_id)
        .map_err(not_found("Operator"))?;

    GlobalEntry {
        action: "EnableOperator",
        details: format!("Enabled operator {}", target.login_name),
        before: super::snapshot(&target)?,
        after: StateSnapshot::new(format!(
            "{{\"operator_id\":{},\"is_disabled\":false}}",
            target.operator_id
        )),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(OperatorStatusResponse {
        operator_id: target.operator_id,
        is_disabled: false,
        message: format!("Operator {} enabled", target.login_name),
    })
}

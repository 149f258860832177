// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability flags for UI gating.
//!
//! Capabilities are derived from the same checks the handlers run, so a
//! button shown as enabled will not be refused for role reasons. They are
//! advisory only; every handler still authorizes on its own.

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::request_response::{Capability, GlobalCapabilities, OperatorCapabilities};
use fleetdesk_persistence::{OperatorData, Persistence};

/// Computes what the logged-in operator may do.
#[must_use]
pub fn compute_global_capabilities(
    actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> GlobalCapabilities {
    let allowed = |ok: bool| Capability::from_bool(ok && !operator.is_disabled);

    GlobalCapabilities {
        can_manage_operators: allowed(
            AuthorizationService::authorize_manage_operators(actor).is_ok(),
        ),
        can_manage_fleet: allowed(AuthorizationService::authorize_manage_fleet(actor).is_ok()),
        can_dispatch: allowed(AuthorizationService::authorize_dispatch(actor, "dispatch").is_ok()),
        can_record_payment: allowed(
            AuthorizationService::authorize_record_payment(actor).is_ok(),
        ),
        can_manage_ledger: allowed(
            AuthorizationService::authorize_manage_ledger(actor, "manage_ledger").is_ok(),
        ),
        can_delete_booking: allowed(
            AuthorizationService::authorize_delete_booking(actor).is_ok(),
        ),
        can_decide_procurement: allowed(
            AuthorizationService::authorize_decide_procurement(actor).is_ok(),
        ),
        can_view_reports: allowed(AuthorizationService::authorize_view_reports(actor).is_ok()),
    }
}

/// Computes what the logged-in operator may do to another operator.
///
/// The last active Admin can never be disabled.
///
/// # Errors
///
/// Returns an error if counting admins fails.
pub fn compute_operator_capabilities(
    actor: &AuthenticatedActor,
    actor_operator: &OperatorData,
    target: &OperatorData,
    persistence: &mut Persistence,
) -> Result<OperatorCapabilities, String> {
    if actor_operator.is_disabled || actor.role != Role::Admin {
        return Ok(OperatorCapabilities {
            can_disable: Capability::Denied,
            can_enable: Capability::Denied,
        });
    }

    let is_last_active_admin = if target.role == Role::Admin.as_str() && !target.is_disabled {
        persistence
            .count_active_admins()
            .map_err(|e| format!("Failed to count active admins: {e}"))?
            <= 1
    } else {
        false
    };

    Ok(OperatorCapabilities {
        can_disable: Capability::from_bool(!target.is_disabled && !is_last_active_admin),
        can_enable: Capability::from_bool(target.is_disabled),
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle procurement requests.
//!
//! A request moves `Requested -> Approved -> Ordered -> Delivered`, or is
//! rejected before it is ordered. Only Admin and Manager decide; the
//! decision and its note are stored on the request.

use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::{
    DomainError, ProcurementStatus, validate_amount_non_negative, validate_quantity, validate_url,
};
use fleetdesk_persistence::{NewProcurement, OperatorData, Persistence, ProcurementData};
use tracing::info;

use super::bookings::MANAGERS;
use super::{GlobalEntry, clean, internal, not_found, parse_money, require_text, snapshot};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::notifier::{Notification, Notifier, Recipient, notify_best_effort};
use crate::request_response::{
    CreateProcurementRequest, CreatedResponse, ListProcurementsResponse,
    UpdateProcurementStatusRequest, WriteResponse,
};

fn load_procurement(
    persistence: &mut Persistence,
    procurement_id: i64,
) -> Result<ProcurementData, ApiError> {
    persistence
        .get_procurement(procurement_id)
        .map_err(not_found("Procurement request"))
}

/// Files a procurement request.
///
/// # Errors
///
/// Returns an error if the actor may not raise requests or a field is
/// invalid.
pub fn create_procurement(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: CreateProcurementRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_request_procurement(authenticated_actor, "create_procurement")?;

    let title = require_text("title", &request.title)?;
    let vehicle_type = require_text("vehicle_type", &request.vehicle_type)?;
    validate_quantity(request.quantity).map_err(translate_domain_error)?;
    let estimated_cost = parse_money("estimated_cost", &request.estimated_cost)?;
    validate_amount_non_negative("estimated_cost", estimated_cost)
        .map_err(translate_domain_error)?;
    let photo_url = clean(request.photo_url);
    if let Some(url) = &photo_url {
        validate_url(url).map_err(|e| ApiError::InvalidInput {
            field: String::from("photo_url"),
            message: e.to_string(),
        })?;
    }

    let procurement_id = persistence
        .insert_procurement(&NewProcurement {
            title: title.clone(),
            vehicle_type,
            quantity: request.quantity,
            estimated_cost,
            supplier: clean(request.supplier),
            justification: clean(request.justification),
            photo_url,
            requested_by: Some(operator.operator_id),
        })
        .map_err(internal("Failed to insert procurement request"))?;
    let created = load_procurement(persistence, procurement_id)?;

    let event_id = GlobalEntry {
        action: "CreateProcurement",
        details: format!(
            "Requested {} x {} ({estimated_cost})",
            created.quantity, created.vehicle_type
        ),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    info!(procurement_id, "Procurement request filed");
    notify_best_effort(
        notifier,
        &Notification::new(
            MANAGERS.to_vec(),
            "Procurement request",
            format!("{title}: awaiting a decision"),
        ),
    );

    Ok(CreatedResponse {
        id: procurement_id,
        event_id,
        message: format!("Procurement request {title} filed"),
    })
}

/// Lists procurement requests, optionally by status.
///
/// # Errors
///
/// Returns an error if the status is unknown or the query fails.
pub fn list_procurements(
    persistence: &mut Persistence,
    status: Option<&str>,
) -> Result<ListProcurementsResponse, ApiError> {
    let status = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<ProcurementStatus>)
        .transpose()
        .map_err(translate_domain_error)?;
    let procurements = persistence
        .list_procurements(status)
        .map_err(internal("Failed to list procurement requests"))?;
    Ok(ListProcurementsResponse { procurements })
}

/// Moves a procurement request to a new status.
///
/// Approving and rejecting need Admin or Manager; ordering and recording
/// delivery need anyone who may raise requests.
///
/// # Errors
///
/// Returns an error if the actor lacks the role for the target status, the
/// request does not exist, or the move is not allowed from its current
/// status.
pub fn update_procurement_status(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: UpdateProcurementStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let target: ProcurementStatus = request
        .status
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    if target.is_decision() {
        AuthorizationService::authorize_decide_procurement(authenticated_actor)?;
    } else {
        AuthorizationService::authorize_request_procurement(
            authenticated_actor,
            "update_procurement_status",
        )?;
    }

    let before = load_procurement(persistence, request.procurement_id)?;
    let current = before
        .procurement_status()
        .map_err(internal("Failed to read procurement status"))?;
    if !current.can_transition_to(target) {
        return Err(translate_domain_error(
            DomainError::InvalidProcurementTransition {
                from: current.to_string(),
                to: target.to_string(),
            },
        ));
    }

    let note = clean(request.note);
    let decided_by = target.is_decision().then_some(operator.operator_id);
    persistence
        .update_procurement_status(request.procurement_id, target, decided_by, note.as_deref())
        .map_err(not_found("Procurement request"))?;
    let after = load_procurement(persistence, request.procurement_id)?;

    let event_id = GlobalEntry {
        action: "UpdateProcurementStatus",
        details: format!("{}: {current} -> {target}", after.title),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    if let Some(requested_by) = after.requested_by {
        let body = note.as_ref().map_or_else(
            || format!("{} is now {target}", after.title),
            |n| format!("{} is now {target}: {n}", after.title),
        );
        notify_best_effort(
            notifier,
            &Notification::new(
                vec![Recipient::Operator(requested_by)],
                "Procurement update",
                body,
            ),
        );
    }

    Ok(WriteResponse {
        event_id,
        message: format!("{} moved to {target}", after.title),
    })
}

/// Deletes a procurement request.
///
/// # Errors
///
/// Returns an error if the actor is not Admin or Manager or the request
/// does not exist.
pub fn delete_procurement(
    persistence: &mut Persistence,
    procurement_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_delete_procurement(authenticated_actor)?;

    let before = load_procurement(persistence, procurement_id)?;
    persistence
        .delete_procurement(procurement_id)
        .map_err(not_found("Procurement request"))?;

    let event_id = GlobalEntry {
        action: "DeleteProcurement",
        details: format!("Deleted procurement request {}", before.title),
        before: snapshot(&before)?,
        after: StateSnapshot::empty(),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Procurement request {} deleted", before.title),
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client records.
//!
//! Clients are created by booking intake, never directly.

use fleetdesk_audit::Cause;
use fleetdesk_domain::validate_client_fields;
use fleetdesk_persistence::{BookingFilter, ClientUpdate, OperatorData, Persistence};

use super::{GlobalEntry, clean, internal, not_found, snapshot};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    BookingInfo, GetClientResponse, ListClientsResponse, UpdateClientRequest, WriteResponse,
};

/// Lists all clients.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_clients(persistence: &mut Persistence) -> Result<ListClientsResponse, ApiError> {
    let clients = persistence
        .list_clients()
        .map_err(internal("Failed to list clients"))?;
    Ok(ListClientsResponse { clients })
}

/// Returns a client with their bookings.
///
/// # Errors
///
/// Returns an error if the client does not exist.
pub fn get_client(
    persistence: &mut Persistence,
    client_id: i64,
) -> Result<GetClientResponse, ApiError> {
    let client = persistence
        .get_client(client_id)
        .map_err(not_found("Client"))?;
    let bookings = persistence
        .list_bookings(&BookingFilter {
            client_id: Some(client_id),
            ..BookingFilter::default()
        })
        .map_err(internal("Failed to list bookings"))?;

    Ok(GetClientResponse {
        client,
        bookings: bookings.iter().map(BookingInfo::from).collect(),
    })
}

/// Edits a client's contact details.
///
/// # Errors
///
/// Returns an error if the actor may not dispatch, a field is invalid, or
/// the client does not exist.
pub fn update_client(
    persistence: &mut Persistence,
    request: UpdateClientRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "update_client")?;

    let email = clean(request.email);
    let phone = validate_client_fields(&request.name, &request.phone, email.as_deref())
        .map_err(translate_domain_error)?;
    let before = persistence
        .get_client(request.client_id)
        .map_err(not_found("Client"))?;

    let update = ClientUpdate {
        name: request.name.trim().to_string(),
        company: clean(request.company),
        phone: phone.as_str().to_string(),
        email,
        address: clean(request.address),
    };
    persistence
        .update_client(request.client_id, &update)
        .map_err(not_found("Client"))?;
    let after = persistence
        .get_client(request.client_id)
        .map_err(not_found("Client"))?;

    let event_id = GlobalEntry {
        action: "UpdateClient",
        details: format!("Updated client {}", after.name),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Client {} updated", after.name),
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::ClientData;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

backend_fn! {
/// Lists clients ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clients(conn: &mut _) -> Result<Vec<ClientData>, PersistenceError> {
    Ok(clients::table
        .order((clients::name.asc(), clients::client_id.asc()))
        .select(ClientData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Retrieves a client by id.
///
/// # Errors
///
/// Returns `NotFound` if no client has this id.
pub fn get_client(conn: &mut _, client_id: i64) -> Result<ClientData, PersistenceError> {
    clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Client {client_id} not found")))
}
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client writes.

use diesel::prelude::*;
use fleetdesk_domain::{BookingDraft, Client, ClientMatch, PhoneNumber};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::{ClientData, ClientUpdate};
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

backend_fn! {
/// Finds the client an intake form refers to, creating one if none matches.
///
/// A client matches on normalized phone, then on company name ignoring case.
/// Returns the client id and whether an existing row was reused.
///
/// # Errors
///
/// Returns an error if a query or the insert fails.
pub fn upsert_client_for_booking(
    conn: &mut _,
    draft: &BookingDraft,
    phone: &PhoneNumber,
) -> Result<(i64, bool), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let known: Vec<Client> = clients::table
            .order(clients::client_id.asc())
            .select(ClientData::as_select())
            .load::<ClientData>(conn)?
            .into_iter()
            .map(Client::from)
            .collect();

        if let Some(client_id) =
            ClientMatch::find_existing(&known, phone, draft.client_company.as_deref())
                .and_then(|client| client.client_id)
        {
            info!(client_id, "Reusing existing client for booking");
            return Ok((client_id, true));
        }

        let now = clock::now()?;
        diesel::insert_into(clients::table)
            .values((
                clients::name.eq(draft.client_name.trim()),
                clients::company.eq(non_blank(draft.client_company.as_deref())),
                clients::phone.eq(phone.as_str()),
                clients::email.eq(non_blank(draft.client_email.as_deref())),
                clients::address.eq(non_blank(draft.client_address.as_deref())),
                clients::created_at.eq(&now),
                clients::updated_at.eq(&now),
            ))
            .execute(conn)?;
        let client_id: i64 = conn.get_last_insert_rowid()?;

        info!(client_id, "Created client for booking");
        Ok((client_id, false))
    })
}
}

backend_fn! {
/// Overwrites a client's contact details.
///
/// # Errors
///
/// Returns `NotFound` if the client does not exist.
pub fn update_client(
    conn: &mut _,
    client_id: i64,
    update: &ClientUpdate,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(clients::table)
        .filter(clients::client_id.eq(client_id))
        .set((
            clients::name.eq(update.name.trim()),
            clients::company.eq(non_blank(update.company.as_deref())),
            clients::phone.eq(&update.phone),
            clients::email.eq(non_blank(update.email.as_deref())),
            clients::address.eq(non_blank(update.address.as_deref())),
            clients::updated_at.eq(clock::now()?),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Client {client_id} not found")));
    }
    Ok(())
}
}

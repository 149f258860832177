// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session mutations.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::diesel_schema::{operators, sessions};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new operator.
///
/// The `login_name` is normalized to uppercase for case-insensitive
/// uniqueness and the password is stored as a bcrypt hash.
///
/// # Errors
///
/// Returns `Conflict` if the login name is taken, or another error if the
/// insert fails.
pub fn create_operator(
    conn: &mut _,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = login_name.trim().to_uppercase();

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(operators::table)
        .values((
            operators::login_name.eq(&normalized_login),
            operators::display_name.eq(display_name.trim()),
            operators::password_hash.eq(&password_hash),
            operators::role.eq(role),
            operators::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;

    let operator_id: i64 = conn.get_last_insert_rowid()?;

    info!(operator_id, login_name = %normalized_login, role, "Created operator");
    Ok(operator_id)
}
}

backend_fn! {
/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set(operators::last_login_at.eq(Some(clock::now()?)))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Disables an operator and ends all of their sessions.
///
/// # Errors
///
/// Returns `OperatorNotFound` if the operator does not exist.
pub fn disable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(operators::table)
            .filter(operators::operator_id.eq(operator_id))
            .set((
                operators::is_disabled.eq(1),
                operators::disabled_at.eq(Some(now.as_str())),
            ))
            .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::OperatorNotFound(format!(
                "Operator with ID {operator_id} not found"
            )));
        }

        let ended: usize = diesel::delete(sessions::table)
            .filter(sessions::operator_id.eq(operator_id))
            .execute(conn)?;

        info!(operator_id, sessions_ended = ended, "Disabled operator");
        Ok(())
    })
}
}

backend_fn! {
/// Re-enables a disabled operator.
///
/// # Errors
///
/// Returns `OperatorNotFound` if the operator does not exist.
pub fn enable_operator(conn: &mut _, operator_id: i64) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(operators::table)
        .filter(operators::operator_id.eq(operator_id))
        .set((
            operators::is_disabled.eq(0),
            operators::disabled_at.eq(None::<String>),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::OperatorNotFound(format!(
            "Operator with ID {operator_id} not found"
        )));
    }

    info!(operator_id, "Enabled operator");
    Ok(())
}
}

backend_fn! {
/// Creates a session for an operator.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    operator_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let now = clock::now()?;
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::operator_id.eq(operator_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, operator_id, "Created session");
    Ok(session_id)
}
}

backend_fn! {
/// Touches a session's last activity timestamp.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(conn: &mut _, session_id: i64) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(clock::now()?))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes a session by token. Unknown tokens are ignored.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(conn: &mut _, session_token: &str) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes sessions whose expiry has passed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut _) -> Result<usize, PersistenceError> {
    let removed: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(clock::now()?))
        .execute(conn)?;
    if removed > 0 {
        info!(removed, "Deleted expired sessions");
    }
    Ok(removed)
}
}

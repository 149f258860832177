// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `WorkDrive` writes. Documents are links; no file bytes pass through here.

use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::NewDocument;
use crate::diesel_schema::{workdrive_documents, workdrive_folders};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a folder under `parent_id`, or at the root.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_folder(
    conn: &mut _,
    parent_id: Option<i64>,
    name: &str,
    created_by: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(workdrive_folders::table)
        .values((
            workdrive_folders::parent_id.eq(parent_id),
            workdrive_folders::name.eq(name.trim()),
            workdrive_folders::created_by.eq(created_by),
            workdrive_folders::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let folder_id: i64 = conn.get_last_insert_rowid()?;

    info!(folder_id, ?parent_id, "Created folder");
    Ok(folder_id)
}
}

backend_fn! {
/// Renames a folder.
///
/// # Errors
///
/// Returns `NotFound` if the folder does not exist.
pub fn rename_folder(conn: &mut _, folder_id: i64, name: &str) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(workdrive_folders::table)
        .filter(workdrive_folders::folder_id.eq(folder_id))
        .set(workdrive_folders::name.eq(name.trim()))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Folder {folder_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes a folder. The caller checks that it is empty.
///
/// # Errors
///
/// Returns `NotFound` if the folder does not exist.
pub fn delete_folder(conn: &mut _, folder_id: i64) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(workdrive_folders::table)
        .filter(workdrive_folders::folder_id.eq(folder_id))
        .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::NotFound(format!("Folder {folder_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Stores a document link.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_document(conn: &mut _, document: &NewDocument) -> Result<i64, PersistenceError> {
    diesel::insert_into(workdrive_documents::table)
        .values((
            workdrive_documents::folder_id.eq(document.folder_id),
            workdrive_documents::name.eq(document.name.trim()),
            workdrive_documents::file_url.eq(&document.file_url),
            workdrive_documents::mime_type.eq(document.mime_type.as_deref()),
            workdrive_documents::size_bytes.eq(document.size_bytes),
            workdrive_documents::uploaded_by.eq(document.uploaded_by),
            workdrive_documents::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let document_id: i64 = conn.get_last_insert_rowid()?;

    info!(document_id, folder_id = ?document.folder_id, "Added document");
    Ok(document_id)
}
}

backend_fn! {
/// Moves a document to another folder, or to the root.
///
/// # Errors
///
/// Returns `NotFound` if the document does not exist.
pub fn move_document(
    conn: &mut _,
    document_id: i64,
    folder_id: Option<i64>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(workdrive_documents::table)
        .filter(workdrive_documents::document_id.eq(document_id))
        .set(workdrive_documents::folder_id.eq(folder_id))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Document {document_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Renames a document.
///
/// # Errors
///
/// Returns `NotFound` if the document does not exist.
pub fn rename_document(
    conn: &mut _,
    document_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(workdrive_documents::table)
        .filter(workdrive_documents::document_id.eq(document_id))
        .set(workdrive_documents::name.eq(name.trim()))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Document {document_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Deletes a document link.
///
/// # Errors
///
/// Returns `NotFound` if the document does not exist.
pub fn delete_document(conn: &mut _, document_id: i64) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(workdrive_documents::table)
        .filter(workdrive_documents::document_id.eq(document_id))
        .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::NotFound(format!("Document {document_id} not found")));
    }
    Ok(())
}
}

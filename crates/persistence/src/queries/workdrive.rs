// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `WorkDrive` folder and document queries.
//!
//! A `None` parent or folder means the drive root.

use diesel::prelude::*;

use crate::data_models::{DocumentData, FolderData};
use crate::diesel_schema::{workdrive_documents, workdrive_folders};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a folder.
///
/// # Errors
///
/// Returns `NotFound` if no folder has this id.
pub fn get_folder(conn: &mut _, folder_id: i64) -> Result<FolderData, PersistenceError> {
    workdrive_folders::table
        .filter(workdrive_folders::folder_id.eq(folder_id))
        .select(FolderData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Folder {folder_id} not found")))
}
}

backend_fn! {
/// Lists the folders directly inside `parent_id`, by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_folders(
    conn: &mut _,
    parent_id: Option<i64>,
) -> Result<Vec<FolderData>, PersistenceError> {
    let mut query = workdrive_folders::table
        .select(FolderData::as_select())
        .into_boxed();
    query = match parent_id {
        Some(parent_id) => query.filter(workdrive_folders::parent_id.eq(parent_id)),
        None => query.filter(workdrive_folders::parent_id.is_null()),
    };
    Ok(query.order(workdrive_folders::name.asc()).load(conn)?)
}
}

backend_fn! {
/// Retrieves a document.
///
/// # Errors
///
/// Returns `NotFound` if no document has this id.
pub fn get_document(conn: &mut _, document_id: i64) -> Result<DocumentData, PersistenceError> {
    workdrive_documents::table
        .filter(workdrive_documents::document_id.eq(document_id))
        .select(DocumentData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Document {document_id} not found")))
}
}

backend_fn! {
/// Lists the documents directly inside `folder_id`, by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_documents(
    conn: &mut _,
    folder_id: Option<i64>,
) -> Result<Vec<DocumentData>, PersistenceError> {
    let mut query = workdrive_documents::table
        .select(DocumentData::as_select())
        .into_boxed();
    query = match folder_id {
        Some(folder_id) => query.filter(workdrive_documents::folder_id.eq(folder_id)),
        None => query.filter(workdrive_documents::folder_id.is_null()),
    };
    Ok(query.order(workdrive_documents::name.asc()).load(conn)?)
}
}

backend_fn! {
/// Whether `parent_id` already holds a folder called `name`, ignoring case.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn folder_name_exists(
    conn: &mut _,
    parent_id: Option<i64>,
    name: &str,
    excluding: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = workdrive_folders::table
        .select((workdrive_folders::folder_id, workdrive_folders::name))
        .into_boxed();
    query = match parent_id {
        Some(parent_id) => query.filter(workdrive_folders::parent_id.eq(parent_id)),
        None => query.filter(workdrive_folders::parent_id.is_null()),
    };
    let siblings: Vec<(i64, String)> = query.load(conn)?;

    let wanted = name.trim().to_lowercase();
    Ok(siblings
        .iter()
        .any(|(id, sibling)| Some(*id) != excluding && sibling.trim().to_lowercase() == wanted))
}
}

backend_fn! {
/// Counts the sub-folders and documents directly inside a folder.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_folder_contents(
    conn: &mut _,
    folder_id: i64,
) -> Result<(i64, i64), PersistenceError> {
    use diesel::dsl::count;

    let folders: i64 = workdrive_folders::table
        .filter(workdrive_folders::parent_id.eq(folder_id))
        .select(count(workdrive_folders::folder_id))
        .first(conn)?;
    let documents: i64 = workdrive_documents::table
        .filter(workdrive_documents::folder_id.eq(folder_id))
        .select(count(workdrive_documents::document_id))
        .first(conn)?;

    Ok((folders, documents))
}
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `WorkDrive`: a shared folder tree of document links.
//!
//! Files themselves live with the upload worker; only their links are
//! stored here. Folder names are unique among siblings and a folder must
//! be empty before it can be deleted.

use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::validate_url;
use fleetdesk_persistence::{DocumentData, FolderData, NewDocument, OperatorData, Persistence};

use super::{GlobalEntry, clean, internal, not_found, require_text, snapshot};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AddDocumentRequest, CreateFolderRequest, CreatedResponse, ListFolderResponse,
    MoveDocumentRequest, RenameRequest, WriteResponse,
};

fn load_folder(persistence: &mut Persistence, folder_id: i64) -> Result<FolderData, ApiError> {
    persistence.get_folder(folder_id).map_err(not_found("Folder"))
}

fn load_document(
    persistence: &mut Persistence,
    document_id: i64,
) -> Result<DocumentData, ApiError> {
    persistence
        .get_document(document_id)
        .map_err(not_found("Document"))
}

/// Fails if `folder_id` names a folder that does not exist.
fn ensure_folder(persistence: &mut Persistence, folder_id: Option<i64>) -> Result<(), ApiError> {
    if let Some(id) = folder_id {
        load_folder(persistence, id)?;
    }
    Ok(())
}

fn ensure_unique_name(
    persistence: &mut Persistence,
    parent_id: Option<i64>,
    name: &str,
    excluding: Option<i64>,
) -> Result<(), ApiError> {
    let taken = persistence
        .folder_name_exists(parent_id, name, excluding)
        .map_err(internal("Failed to check folder names"))?;
    if taken {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("unique_folder_name"),
            message: format!("A folder named '{name}' already exists here"),
        });
    }
    Ok(())
}

/// Creates a folder.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents, the parent does
/// not exist, or a sibling already has the name.
pub fn create_folder(
    persistence: &mut Persistence,
    request: &CreateFolderRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "create_folder")?;

    let name = require_text("name", &request.name)?;
    ensure_folder(persistence, request.parent_id)?;
    ensure_unique_name(persistence, request.parent_id, &name, None)?;

    let folder_id = persistence
        .insert_folder(request.parent_id, &name, Some(operator.operator_id))
        .map_err(not_found("Folder"))?;
    let created = load_folder(persistence, folder_id)?;

    let event_id = GlobalEntry {
        action: "CreateFolder",
        details: format!("Created folder {name}"),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreatedResponse {
        id: folder_id,
        event_id,
        message: format!("Folder {name} created"),
    })
}

/// Renames a folder.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents, the folder does
/// not exist, or a sibling already has the name.
pub fn rename_folder(
    persistence: &mut Persistence,
    request: &RenameRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "rename_folder")?;

    let name = require_text("name", &request.name)?;
    let before = load_folder(persistence, request.id)?;
    ensure_unique_name(persistence, before.parent_id, &name, Some(request.id))?;

    persistence
        .rename_folder(request.id, &name)
        .map_err(not_found("Folder"))?;
    let after = load_folder(persistence, request.id)?;

    let event_id = GlobalEntry {
        action: "RenameFolder",
        details: format!("Renamed folder {} to {name}", before.name),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Folder renamed to {name}"),
    })
}

/// Deletes an empty folder.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents, the folder does
/// not exist, or it still holds folders or documents.
pub fn delete_folder(
    persistence: &mut Persistence,
    folder_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "delete_folder")?;

    let before = load_folder(persistence, folder_id)?;
    let (folders, documents) = persistence
        .count_folder_contents(folder_id)
        .map_err(internal("Failed to count folder contents"))?;
    if folders > 0 || documents > 0 {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("folder_not_empty"),
            message: format!(
                "Folder {} still holds {folders} folder(s) and {documents} document(s)",
                before.name
            ),
        });
    }

    persistence
        .delete_folder(folder_id)
        .map_err(not_found("Folder"))?;

    let event_id = GlobalEntry {
        action: "DeleteFolder",
        details: format!("Deleted folder {}", before.name),
        before: snapshot(&before)?,
        after: StateSnapshot::empty(),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Folder {} deleted", before.name),
    })
}

/// Lists a folder's sub-folders and documents. `None` lists the root.
///
/// # Errors
///
/// Returns an error if the folder does not exist.
pub fn list_folder(
    persistence: &mut Persistence,
    folder_id: Option<i64>,
) -> Result<ListFolderResponse, ApiError> {
    let folder = folder_id
        .map(|id| load_folder(persistence, id))
        .transpose()?;
    let folders = persistence
        .list_folders(folder_id)
        .map_err(internal("Failed to list folders"))?;
    let documents = persistence
        .list_documents(folder_id)
        .map_err(internal("Failed to list documents"))?;
    Ok(ListFolderResponse {
        folder,
        folders,
        documents,
    })
}

/// Stores a link to an uploaded file.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents, the folder does
/// not exist, or the link is not a web URL.
pub fn add_document(
    persistence: &mut Persistence,
    request: AddDocumentRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "add_document")?;

    let name = require_text("name", &request.name)?;
    let file_url = request.file_url.trim().to_string();
    validate_url(&file_url).map_err(translate_domain_error)?;
    if request.size_bytes.is_some_and(|size| size < 0) {
        return Err(ApiError::InvalidInput {
            field: String::from("size_bytes"),
            message: String::from("Size cannot be negative"),
        });
    }
    ensure_folder(persistence, request.folder_id)?;

    let document_id = persistence
        .insert_document(&NewDocument {
            folder_id: request.folder_id,
            name: name.clone(),
            file_url,
            mime_type: clean(request.mime_type),
            size_bytes: request.size_bytes,
            uploaded_by: Some(operator.operator_id),
        })
        .map_err(not_found("Folder"))?;
    let created = load_document(persistence, document_id)?;

    let event_id = GlobalEntry {
        action: "AddDocument",
        details: format!("Added document {name}"),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreatedResponse {
        id: document_id,
        event_id,
        message: format!("Document {name} added"),
    })
}

/// Moves a document to another folder.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents or either the
/// document or the target folder does not exist.
pub fn move_document(
    persistence: &mut Persistence,
    request: MoveDocumentRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "move_document")?;

    let before = load_document(persistence, request.document_id)?;
    ensure_folder(persistence, request.folder_id)?;
    persistence
        .move_document(request.document_id, request.folder_id)
        .map_err(not_found("Document"))?;
    let after = load_document(persistence, request.document_id)?;

    let event_id = GlobalEntry {
        action: "MoveDocument",
        details: format!("Moved document {}", after.name),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Document {} moved", after.name),
    })
}

/// Renames a document.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents or the document
/// does not exist.
pub fn rename_document(
    persistence: &mut Persistence,
    request: &RenameRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "rename_document")?;

    let name = require_text("name", &request.name)?;
    let before = load_document(persistence, request.id)?;
    persistence
        .rename_document(request.id, &name)
        .map_err(not_found("Document"))?;
    let after = load_document(persistence, request.id)?;

    let event_id = GlobalEntry {
        action: "RenameDocument",
        details: format!("Renamed document {} to {name}", before.name),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Document renamed to {name}"),
    })
}

/// Removes a document link.
///
/// # Errors
///
/// Returns an error if the actor may not manage documents or the document
/// does not exist.
pub fn delete_document(
    persistence: &mut Persistence,
    document_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_documents(authenticated_actor, "delete_document")?;

    let before = load_document(persistence, document_id)?;
    persistence
        .delete_document(document_id)
        .map_err(not_found("Document"))?;

    let event_id = GlobalEntry {
        action: "DeleteDocument",
        details: format!("Deleted document {}", before.name),
        before: snapshot(&before)?,
        after: StateSnapshot::empty(),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Document {} deleted", before.name),
    })
}

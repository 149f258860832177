// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fleetdesk_persistence::Persistence;

use crate::handlers::workdrive;
use crate::tests::helpers::{
    TestOperator, create_persistence, create_test_admin, create_test_cause, create_test_operator,
};
use crate::{
    AddDocumentRequest, ApiError, CreateFolderRequest, MoveDocumentRequest, RenameRequest, Role,
};

fn folder(persistence: &mut Persistence, by: &TestOperator, parent: Option<i64>, name: &str) -> i64 {
    workdrive::create_folder(
        persistence,
        &CreateFolderRequest {
            parent_id: parent,
            name: String::from(name),
        },
        &by.actor,
        &by.operator,
        create_test_cause(),
    )
    .unwrap()
    .id
}

fn waybill_scan(folder_id: Option<i64>, url: &str) -> AddDocumentRequest {
    AddDocumentRequest {
        folder_id,
        name: String::from("Waybill JOB-20260314-0001.pdf"),
        file_url: String::from(url),
        mime_type: Some(String::from("application/pdf")),
        size_bytes: Some(48_213),
    }
}

#[test]
fn test_sibling_folder_names_are_unique() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let waybills = folder(&mut persistence, &admin, None, "Waybills");
    folder(&mut persistence, &admin, Some(waybills), "2026");

    // Same name under a different parent is fine.
    folder(&mut persistence, &admin, None, "2026");

    let duplicate = workdrive::create_folder(
        &mut persistence,
        &CreateFolderRequest {
            parent_id: Some(waybills),
            name: String::from("2026"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    match duplicate {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "unique_folder_name"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
}

#[test]
fn test_rename_folder_checks_siblings() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    folder(&mut persistence, &admin, None, "Receipts");
    let invoices = folder(&mut persistence, &admin, None, "Invoices");

    let clash = workdrive::rename_folder(
        &mut persistence,
        &RenameRequest {
            id: invoices,
            name: String::from("Receipts"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    assert!(matches!(clash, Err(ApiError::DomainRuleViolation { .. })));

    workdrive::rename_folder(
        &mut persistence,
        &RenameRequest {
            id: invoices,
            name: String::from("Supplier invoices"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    let root = workdrive::list_folder(&mut persistence, None).unwrap();
    let names: Vec<_> = root.folders.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"Supplier invoices"));
}

#[test]
fn test_folder_must_be_empty_to_delete() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let waybills = folder(&mut persistence, &admin, None, "Waybills");
    let document_id = workdrive::add_document(
        &mut persistence,
        waybill_scan(Some(waybills), "https://files.example.com/w/1.pdf"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;

    let refused = workdrive::delete_folder(
        &mut persistence,
        waybills,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    match refused {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "folder_not_empty"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }

    workdrive::delete_document(
        &mut persistence,
        document_id,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    workdrive::delete_folder(
        &mut persistence,
        waybills,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();
    assert!(workdrive::list_folder(&mut persistence, None).unwrap().folders.is_empty());
}

#[test]
fn test_move_document_between_folders() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let inbox = folder(&mut persistence, &admin, None, "Inbox");
    let filed = folder(&mut persistence, &admin, None, "Filed");
    let document_id = workdrive::add_document(
        &mut persistence,
        waybill_scan(Some(inbox), "https://files.example.com/w/1.pdf"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;

    workdrive::move_document(
        &mut persistence,
        MoveDocumentRequest {
            document_id,
            folder_id: Some(filed),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    assert!(workdrive::list_folder(&mut persistence, Some(inbox)).unwrap().documents.is_empty());
    let listed = workdrive::list_folder(&mut persistence, Some(filed)).unwrap();
    assert_eq!(listed.folder.map(|f| f.name), Some(String::from("Filed")));
    assert_eq!(listed.documents.len(), 1);
    assert_eq!(listed.documents[0].document_id, document_id);

    let missing = workdrive::move_document(
        &mut persistence,
        MoveDocumentRequest {
            document_id,
            folder_id: Some(9_999),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_document_link_must_be_web_url() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = workdrive::add_document(
        &mut persistence,
        waybill_scan(None, "ftp://files.example.com/w/1.pdf"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "file_url"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_driver_cannot_add_documents() {
    let mut persistence = create_persistence();
    let driver = create_test_operator(&mut persistence, "driver1", Role::Driver);

    let result = workdrive::add_document(
        &mut persistence,
        waybill_scan(None, "https://files.example.com/w/1.pdf"),
        &driver.actor,
        &driver.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

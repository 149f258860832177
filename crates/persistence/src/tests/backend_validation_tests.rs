// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema and constraint checks against a real `MariaDB`.
//!
//! Everything here is `#[ignore]`d. `cargo xtask test-mariadb` starts a
//! container, exports `DATABASE_URL` and `FLEETDESK_TEST_BACKEND=mariadb`,
//! and runs these one at a time against the same database, so rows written
//! by one test are visible to the next. Use values no other test uses.
//!
//! Business rules are covered by the `SQLite` suite; these tests only pin
//! down what the MySQL migrations and connection setup must provide.

use diesel::MysqlConnection;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::env;
use time::{Date, Month};

use crate::Persistence;
use crate::backend::mysql;

#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct LastInsertIdResult {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// The database URL exported by xtask.
///
/// # Panics
///
/// Panics when run outside `cargo xtask test-mariadb`.
fn mariadb_url() -> String {
    let backend = env::var("FLEETDESK_TEST_BACKEND").expect(
        "FLEETDESK_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "FLEETDESK_TEST_BACKEND must be 'mariadb'");
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// A migrated raw connection.
fn connect() -> MysqlConnection {
    mysql::initialize_database(&mariadb_url()).expect("Failed to initialize MariaDB database")
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    let result = MysqlConnection::establish(&mariadb_url());
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    let result = mysql::initialize_database(&mariadb_url());
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    let mut conn = connect();

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_operator_login_unique() {
    let mut conn = connect();

    diesel::sql_query(
        "INSERT INTO operators (login_name, display_name, password_hash, role, created_at)
         VALUES ('UNIQ_USER', 'Test User', 'hash', 'Admin', '2026-01-01 00:00:00')",
    )
    .execute(&mut conn)
    .expect("Failed to insert test operator");

    let duplicate_result = diesel::sql_query(
        "INSERT INTO operators (login_name, display_name, password_hash, role, created_at)
         VALUES ('UNIQ_USER', 'Another User', 'hash2', 'Driver', '2026-01-01 00:00:00')",
    )
    .execute(&mut conn);

    assert!(
        duplicate_result.is_err(),
        "Duplicate login_name should fail due to UNIQUE constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_booking_requires_client() {
    let mut conn = connect();

    let result = diesel::sql_query(
        "INSERT INTO bookings
         (job_id, client_id, pickup_address, dropoff_address, cargo_description, pickup_date,
          budget_kobo, status, fuel_kobo, ticketing_kobo, allowance_kobo, payment_status,
          created_at, updated_at)
         VALUES ('JOB-20990101-0001', 99999, 'A', 'B', 'C', '2099-01-01',
                 0, 'Open', 0, 0, 0, 'Unpaid', '2099-01-01 00:00:00', '2099-01-01 00:00:00')",
    )
    .execute(&mut conn);

    assert!(
        result.is_err(),
        "Booking with non-existent client should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_expense_requires_account() {
    let mut conn = connect();

    let result = diesel::sql_query(
        "INSERT INTO expense_transactions
         (account_id, category, amount_kobo, description, created_at)
         VALUES (99999, 'Fuel', 100, 'orphan', '2099-01-01 00:00:00')",
    )
    .execute(&mut conn);

    assert!(
        result.is_err(),
        "Expense against a non-existent account should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    let mut conn = connect();

    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(
        "INSERT INTO prepaid_accounts (name, category, balance_kobo, created_at)
         VALUES ('Rollback Card', 'Fuel', 0, '2026-01-01 00:00:00')",
    )
    .execute(&mut conn)
    .expect("Failed to insert account");

    let count: i64 = diesel::sql_query(
        "SELECT COUNT(*) as count FROM prepaid_accounts WHERE name = 'Rollback Card'",
    )
    .get_result::<CountResult>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count accounts");

    assert_eq!(count, 1, "Account should exist within transaction");

    // A test transaction is never committed.
    drop(conn);

    let mut new_conn = connect();

    let count_after: i64 = diesel::sql_query(
        "SELECT COUNT(*) as count FROM prepaid_accounts WHERE name = 'Rollback Card'",
    )
    .get_result::<CountResult>(&mut new_conn)
    .map(|r| r.count)
    .expect("Failed to count accounts after rollback");

    assert_eq!(count_after, 0, "Account should not exist after rollback");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_job_sequence_unique_per_day() {
    let mut conn = connect();

    diesel::sql_query(
        "INSERT INTO job_id_sequences (sequence_date, last_sequence) VALUES ('2098-02-02', 1)",
    )
    .execute(&mut conn)
    .expect("Failed to insert sequence row");

    let result = diesel::sql_query(
        "INSERT INTO job_id_sequences (sequence_date, last_sequence) VALUES ('2098-02-02', 5)",
    )
    .execute(&mut conn);

    assert!(
        result.is_err(),
        "A second sequence row for the same day should fail"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_last_insert_id() {
    let mut conn = connect();

    diesel::sql_query(
        "INSERT INTO workdrive_folders (parent_id, name, created_at)
         VALUES (NULL, 'Insert Id Check', '2026-01-01 00:00:00')",
    )
    .execute(&mut conn)
    .expect("Failed to insert folder");

    let id: i64 = diesel::sql_query("SELECT LAST_INSERT_ID() as id")
        .get_result::<LastInsertIdResult>(&mut conn)
        .map(|r| r.id)
        .expect("Failed to read LAST_INSERT_ID");

    assert!(id > 0);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_persistence_issues_job_ids_in_order() {
    let mut persistence =
        Persistence::new_with_mysql(&mariadb_url()).expect("Failed to open MariaDB persistence");
    let date = Date::from_calendar_date(2097, Month::May, 5).unwrap();

    let first = persistence.generate_job_id(date).unwrap();
    let second = persistence.generate_job_id(date).unwrap();

    assert!(first.as_str().starts_with("JOB-20970505-"));
    assert!(second.as_str() > first.as_str());
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_persistence_operator_round_trip() {
    let mut persistence =
        Persistence::new_with_mysql(&mariadb_url()).expect("Failed to open MariaDB persistence");

    let operator_id = persistence
        .create_operator("mysql_check", "MySQL Check", "Fleet-Desk-2026", "Accountant")
        .unwrap();
    let operator = persistence.get_operator_by_login("MYSQL_CHECK").unwrap().unwrap();

    assert_eq!(operator.operator_id, operator_id);
    assert_eq!(operator.role, "Accountant");
}

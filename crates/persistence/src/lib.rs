// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Fleetdesk back office.
//!
//! Stores bookings and their job timeline, clients, the fleet, the prepaid
//! expense ledger, maintenance, procurement, and `WorkDrive` links. Built on
//! Diesel with embedded migrations.
//!
//! ## Database Backend Support
//!
//! - **`SQLite`** (default) — development, tests, and single-site deployments
//! - **`MariaDB`/`MySQL`** — behind the `mysql` feature, validated by opt-in tests
//!
//! To run the `MySQL` validation tests:
//! ```bash
//! cargo xtask test-mariadb
//! ```
//!
//! ### Migration Strategy
//!
//! - `migrations/` — `SQLite` syntax
//! - `migrations_mysql/` — `MySQL`/`MariaDB` syntax
//!
//! Both describe the same schema.
//!
//! ## Money and Time
//!
//! Money columns hold kobo as `BIGINT`. Dates are `YYYY-MM-DD` text and
//! timestamps are UTC `YYYY-MM-DD HH:MM:SS` text written by this crate.
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against in-memory `SQLite` only
//! - Backend validation tests are marked `#[ignore]`
//! - External database tests never run automatically

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fleetdesk::TransitionResult;
use fleetdesk_audit::AuditEvent;
use fleetdesk_domain::{
    BookingDraft, ExpenseCategory, JobId, MaintenanceStatus, Money, PhoneNumber,
    ProcurementStatus, Refund, VehicleStatus,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates monomorphic backend-specific versions of a query or mutation.
///
/// From one body this emits `<name>_sqlite(&mut SqliteConnection, ..)` and,
/// with the `mysql` feature, `<name>_mysql(&mut MysqlConnection, ..)`.
/// Diesel needs a concrete backend type at compile time; the macro only
/// duplicates the body and substitutes the connection type.
///
/// ```ignore
/// backend_fn! {
///     pub fn get_thing(conn: &mut _, id: i64) -> Result<String, PersistenceError> {
///         things::table
///             .filter(things::id.eq(id))
///             .select(things::name)
///             .first(conn)
///             .map_err(Into::into)
///     }
/// }
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut diesel::SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            #[cfg(feature = "mysql")]
            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut diesel::MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

/// Calls the version of a `backend_fn!` function matching the open connection.
///
/// `dispatch!(self, queries::bookings, get_booking(id))` expands to a match
/// over `self.conn` calling `queries::bookings::get_booking_sqlite(conn, id)`
/// or its `_mysql` twin.
macro_rules! dispatch {
    ($self:ident, $($module:ident)::+, $func:ident ( $($arg:expr),* $(,)? )) => {
        pastey::paste! {
            match &mut $self.conn {
                BackendConnection::Sqlite(conn) => $($module)::+::[<$func _sqlite>](conn $(, $arg)*),
                #[cfg(feature = "mysql")]
                BackendConnection::Mysql(conn) => $($module)::+::[<$func _mysql>](conn $(, $arg)*),
            }
        }
    };
}

mod backend;
mod clock;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod rows;

#[cfg(test)]
mod tests;

pub use data_models::{
    BookingFilter, ClientData, ClientUpdate, DeletionLogData, DeletionSummary, DocumentData,
    DriverData, ExpenseFilter, ExpenseTransactionData, FolderData, IncidentData,
    MaintenanceLogData, MaintenanceScheduleData, NegotiationData, NewDeletionLog, NewDocument,
    NewDriver, NewExpenseTransaction, NewMaintenanceLog, NewMaintenanceSchedule, NewProcurement,
    NewTopup, NewVehicle, OperatorData, PersistTransitionResult, PrepaidAccountData,
    ProcurementData, Reconciliation, ScheduleAdvance, SessionData, TopupData, VehicleData,
    WaybillData,
};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// The open database connection.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    #[cfg(feature = "mysql")]
    Mysql(diesel::MysqlConnection),
}

/// Persistence adapter for every Fleetdesk table.
///
/// Backend selection happens once at construction time and is transparent
/// to callers.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory `SQLite` database.
    ///
    /// Each call gets its own shared-cache database name, so tests never see
    /// each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a persistence adapter over a `SQLite` file, in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Creates a persistence adapter over a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    #[cfg(feature = "mysql")]
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn = backend::mysql::initialize_database(database_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            #[cfg(feature = "mysql")]
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Operators & Sessions
    // ========================================================================

    /// Creates an operator with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the login name is taken.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::operators,
            create_operator(login_name, display_name, password, role)
        )
    }

    /// Looks up an operator by login name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        dispatch!(self, queries::operators, get_operator_by_login(login_name))
    }

    /// Looks up an operator by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        dispatch!(self, queries::operators, get_operator_by_id(operator_id))
    }

    /// Lists all operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_operators(&mut self) -> Result<Vec<OperatorData>, PersistenceError> {
        dispatch!(self, queries::operators, list_operators())
    }

    /// Disables an operator and ends their sessions.
    ///
    /// # Errors
    ///
    /// Returns `OperatorNotFound` if the operator does not exist.
    pub fn disable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::operators, disable_operator(operator_id))
    }

    /// Re-enables an operator.
    ///
    /// # Errors
    ///
    /// Returns `OperatorNotFound` if the operator does not exist.
    pub fn enable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::operators, enable_operator(operator_id))
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::operators, update_last_login(operator_id))
    }

    /// Counts all operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_operators(&mut self) -> Result<i64, PersistenceError> {
        dispatch!(self, queries::operators, count_operators())
    }

    /// Counts enabled `Admin` operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_active_admins(&mut self) -> Result<i64, PersistenceError> {
        dispatch!(self, queries::operators, count_active_admins())
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash cannot be parsed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::verify_password(password, password_hash)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::operators,
            create_session(session_token, operator_id, expires_at)
        )
    }

    /// Looks up a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        dispatch!(self, queries::operators, get_session_by_token(session_token))
    }

    /// Touches a session's last activity time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::operators, update_session_activity(session_id))
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::operators, delete_session(session_token))
    }

    /// Deletes expired sessions and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        dispatch!(self, mutations::operators, delete_expired_sessions())
    }

    // ========================================================================
    // Job Timeline
    // ========================================================================

    /// Appends a timeline entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::timeline, persist_audit_event(event))
    }

    /// Returns a booking's timeline, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_job_timeline(&mut self, booking_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        dispatch!(self, queries::timeline, get_job_timeline(booking_id))
    }

    /// Returns entries not tied to a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_global_audit_events(&mut self) -> Result<Vec<AuditEvent>, PersistenceError> {
        dispatch!(self, queries::timeline, get_global_audit_events())
    }

    /// Returns one timeline entry.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if there is no such entry.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        dispatch!(self, queries::timeline, get_audit_event(event_id))
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Resolves the client for an intake form, creating one when none match.
    ///
    /// Returns the client id and whether an existing client was reused.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the insert fails.
    pub fn upsert_client_for_booking(
        &mut self,
        draft: &BookingDraft,
        phone: &PhoneNumber,
    ) -> Result<(i64, bool), PersistenceError> {
        dispatch!(self, mutations::clients, upsert_client_for_booking(draft, phone))
    }

    /// Lists clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_clients(&mut self) -> Result<Vec<ClientData>, PersistenceError> {
        dispatch!(self, queries::clients, list_clients())
    }

    /// Retrieves a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such client.
    pub fn get_client(&mut self, client_id: i64) -> Result<ClientData, PersistenceError> {
        dispatch!(self, queries::clients, get_client(client_id))
    }

    /// Overwrites a client's details.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such client.
    pub fn update_client(
        &mut self,
        client_id: i64,
        update: &ClientUpdate,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::clients, update_client(client_id, update))
    }

    // ========================================================================
    // Fleet
    // ========================================================================

    /// Registers a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the plate is already registered.
    pub fn insert_vehicle(&mut self, vehicle: &NewVehicle) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::fleet, insert_vehicle(vehicle))
    }

    /// Lists vehicles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_vehicles(&mut self) -> Result<Vec<VehicleData>, PersistenceError> {
        dispatch!(self, queries::fleet, list_vehicles())
    }

    /// Retrieves a vehicle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such vehicle.
    pub fn get_vehicle(&mut self, vehicle_id: i64) -> Result<VehicleData, PersistenceError> {
        dispatch!(self, queries::fleet, get_vehicle(vehicle_id))
    }

    /// Sets a vehicle's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such vehicle.
    pub fn update_vehicle_status(
        &mut self,
        vehicle_id: i64,
        status: VehicleStatus,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, update_vehicle_status(vehicle_id, status))
    }

    /// Registers a driver.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the license number is already registered.
    pub fn insert_driver(&mut self, driver: &NewDriver) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::fleet, insert_driver(driver))
    }

    /// Lists drivers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_drivers(&mut self) -> Result<Vec<DriverData>, PersistenceError> {
        dispatch!(self, queries::fleet, list_drivers())
    }

    /// Retrieves a driver.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such driver.
    pub fn get_driver(&mut self, driver_id: i64) -> Result<DriverData, PersistenceError> {
        dispatch!(self, queries::fleet, get_driver(driver_id))
    }

    /// Retrieves the driver profile linked to an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_driver_for_operator(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<DriverData>, PersistenceError> {
        dispatch!(self, queries::fleet, get_driver_for_operator(operator_id))
    }

    /// Gives a driver a vehicle, or takes it away.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the driver or vehicle does not exist.
    pub fn set_driver_vehicle(
        &mut self,
        driver_id: i64,
        vehicle_id: Option<i64>,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::fleet, set_driver_vehicle(driver_id, vehicle_id))
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Issues the next `JOB-YYYYMMDD-NNNN` id for `date`.
    ///
    /// # Errors
    ///
    /// Returns `SequenceExhausted` when the day's numbers are used up.
    pub fn generate_job_id(&mut self, date: Date) -> Result<JobId, PersistenceError> {
        dispatch!(self, mutations::bookings, generate_job_id(date))
    }

    /// Writes a new booking and its creation timeline entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails; nothing is written in that case.
    pub fn insert_booking(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        dispatch!(self, mutations::bookings, insert_booking(result))
    }

    /// Stores a lifecycle transition and its timeline entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails; nothing is written in that case.
    pub fn update_booking(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        dispatch!(self, mutations::bookings, update_booking(result))
    }

    /// Retrieves a booking.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if there is no such booking.
    pub fn get_booking(&mut self, booking_id: i64) -> Result<fleetdesk::Booking, PersistenceError> {
        dispatch!(self, queries::bookings, get_booking(booking_id))
    }

    /// Retrieves a booking by job id.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if there is no such booking.
    pub fn get_booking_by_job_id(
        &mut self,
        job_id: &JobId,
    ) -> Result<fleetdesk::Booking, PersistenceError> {
        dispatch!(self, queries::bookings, get_booking_by_job_id(job_id))
    }

    /// Lists bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(
        &mut self,
        filter: &BookingFilter,
    ) -> Result<Vec<fleetdesk::Booking>, PersistenceError> {
        dispatch!(self, queries::bookings, list_bookings(filter))
    }

    /// Records a price offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_negotiation(
        &mut self,
        booking_id: i64,
        proposed: Money,
        message: Option<&str>,
        author_operator_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::bookings,
            insert_negotiation(booking_id, proposed, message, author_operator_id)
        )
    }

    /// Lists a booking's price offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_negotiations(
        &mut self,
        booking_id: i64,
    ) -> Result<Vec<NegotiationData>, PersistenceError> {
        dispatch!(self, queries::bookings, list_negotiations(booking_id))
    }

    /// Records a waybill link.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_waybill(
        &mut self,
        booking_id: i64,
        file_url: &str,
        file_name: &str,
        uploaded_by: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::bookings,
            insert_waybill(booking_id, file_url, file_name, uploaded_by)
        )
    }

    /// Lists a booking's waybills.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_waybills(&mut self, booking_id: i64) -> Result<Vec<WaybillData>, PersistenceError> {
        dispatch!(self, queries::bookings, list_waybills(booking_id))
    }

    /// Records a trip incident.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_incident(
        &mut self,
        booking_id: i64,
        description: &str,
        severity: &str,
        reported_by: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        dispatch!(
            self,
            mutations::bookings,
            insert_incident(booking_id, description, severity, reported_by)
        )
    }

    /// Lists a booking's incidents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_incidents(&mut self, booking_id: i64) -> Result<Vec<IncidentData>, PersistenceError> {
        dispatch!(self, queries::bookings, list_incidents(booking_id))
    }

    /// Deletes a booking, its dependent rows and timeline, refunds its
    /// expenses, and records the deletion, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is written in that case.
    pub fn delete_booking_cascade(
        &mut self,
        booking_id: i64,
        refunds: &[Refund],
        deletion: &NewDeletionLog,
        event: &AuditEvent,
    ) -> Result<DeletionSummary, PersistenceError> {
        dispatch!(
            self,
            mutations::bookings,
            delete_booking_cascade(booking_id, refunds, deletion, event)
        )
    }

    /// Lists deleted bookings, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_deletion_logs(&mut self) -> Result<Vec<DeletionLogData>, PersistenceError> {
        dispatch!(self, queries::bookings, list_deletion_logs())
    }

    // ========================================================================
    // Prepaid Ledger
    // ========================================================================

    /// Opens a prepaid account.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the name is taken.
    pub fn insert_prepaid_account(
        &mut self,
        name: &str,
        category: ExpenseCategory,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::ledger, insert_prepaid_account(name, category))
    }

    /// Lists prepaid accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_prepaid_accounts(&mut self) -> Result<Vec<PrepaidAccountData>, PersistenceError> {
        dispatch!(self, queries::ledger, list_prepaid_accounts())
    }

    /// Retrieves a prepaid account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such account.
    pub fn get_prepaid_account(
        &mut self,
        account_id: i64,
    ) -> Result<PrepaidAccountData, PersistenceError> {
        dispatch!(self, queries::ledger, get_prepaid_account(account_id))
    }

    /// Credits an account and records the top-up.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such account.
    pub fn insert_topup(&mut self, topup: &NewTopup) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::ledger, insert_topup(topup))
    }

    /// Lists top-ups.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_topups(&mut self, account_id: Option<i64>) -> Result<Vec<TopupData>, PersistenceError> {
        dispatch!(self, queries::ledger, list_topups(account_id))
    }

    /// Debits an account and records the expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such account.
    pub fn insert_expense_transaction(
        &mut self,
        expense: &NewExpenseTransaction,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::ledger, insert_expense_transaction(expense))
    }

    /// Lists expense transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_expense_transactions(
        &mut self,
        filter: ExpenseFilter,
    ) -> Result<Vec<ExpenseTransactionData>, PersistenceError> {
        dispatch!(self, queries::ledger, list_expense_transactions(filter))
    }

    /// Whether a booking already has an expense in `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn booking_has_expense_category(
        &mut self,
        booking_id: i64,
        category: ExpenseCategory,
    ) -> Result<bool, PersistenceError> {
        dispatch!(
            self,
            queries::ledger,
            booking_has_expense_category(booking_id, category)
        )
    }

    /// Recomputes and stores an account balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such account.
    pub fn reconcile_account(&mut self, account_id: i64) -> Result<Reconciliation, PersistenceError> {
        dispatch!(self, mutations::ledger, reconcile_account(account_id))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Logs a service visit.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_maintenance_log(
        &mut self,
        log: &NewMaintenanceLog,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::maintenance, insert_maintenance_log(log))
    }

    /// Retrieves a maintenance log.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such log.
    pub fn get_maintenance_log(&mut self, log_id: i64) -> Result<MaintenanceLogData, PersistenceError> {
        dispatch!(self, queries::maintenance, get_maintenance_log(log_id))
    }

    /// Lists maintenance logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_maintenance_logs(
        &mut self,
        vehicle_id: Option<i64>,
    ) -> Result<Vec<MaintenanceLogData>, PersistenceError> {
        dispatch!(self, queries::maintenance, list_maintenance_logs(vehicle_id))
    }

    /// Moves a log to a new status with its vehicle and schedule side effects.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a referenced row does not exist.
    pub fn update_maintenance_status(
        &mut self,
        log_id: i64,
        status: MaintenanceStatus,
        vehicle_status: Option<VehicleStatus>,
        schedule: Option<&ScheduleAdvance>,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::maintenance,
            update_maintenance_status(log_id, status, vehicle_status, schedule)
        )
    }

    /// Deletes a maintenance log.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such log.
    pub fn delete_maintenance_log(&mut self, log_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::maintenance, delete_maintenance_log(log_id))
    }

    /// Creates a recurring schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_maintenance_schedule(
        &mut self,
        schedule: &NewMaintenanceSchedule,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::maintenance, insert_maintenance_schedule(schedule))
    }

    /// Lists schedules by next due date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_maintenance_schedules(
        &mut self,
        active_only: bool,
    ) -> Result<Vec<MaintenanceScheduleData>, PersistenceError> {
        dispatch!(self, queries::maintenance, list_maintenance_schedules(active_only))
    }

    /// Retrieves a schedule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such schedule.
    pub fn get_maintenance_schedule(
        &mut self,
        schedule_id: i64,
    ) -> Result<MaintenanceScheduleData, PersistenceError> {
        dispatch!(self, queries::maintenance, get_maintenance_schedule(schedule_id))
    }

    /// Finds the active schedule for a vehicle and service type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_active_schedule(
        &mut self,
        vehicle_id: i64,
        service_type: &str,
    ) -> Result<Option<MaintenanceScheduleData>, PersistenceError> {
        dispatch!(
            self,
            queries::maintenance,
            find_active_schedule(vehicle_id, service_type)
        )
    }

    /// Deactivates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such schedule.
    pub fn deactivate_maintenance_schedule(&mut self, schedule_id: i64) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::maintenance,
            deactivate_maintenance_schedule(schedule_id)
        )
    }

    // ========================================================================
    // Procurement
    // ========================================================================

    /// Files a procurement request.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_procurement(&mut self, request: &NewProcurement) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::procurement, insert_procurement(request))
    }

    /// Retrieves a procurement request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such request.
    pub fn get_procurement(&mut self, procurement_id: i64) -> Result<ProcurementData, PersistenceError> {
        dispatch!(self, queries::procurement, get_procurement(procurement_id))
    }

    /// Lists procurement requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_procurements(
        &mut self,
        status: Option<ProcurementStatus>,
    ) -> Result<Vec<ProcurementData>, PersistenceError> {
        dispatch!(self, queries::procurement, list_procurements(status))
    }

    /// Sets a procurement request's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such request.
    pub fn update_procurement_status(
        &mut self,
        procurement_id: i64,
        status: ProcurementStatus,
        decided_by: Option<i64>,
        decision_note: Option<&str>,
    ) -> Result<(), PersistenceError> {
        dispatch!(
            self,
            mutations::procurement,
            update_procurement_status(procurement_id, status, decided_by, decision_note)
        )
    }

    /// Deletes a procurement request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such request.
    pub fn delete_procurement(&mut self, procurement_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::procurement, delete_procurement(procurement_id))
    }

    // ========================================================================
    // WorkDrive
    // ========================================================================

    /// Creates a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_folder(
        &mut self,
        parent_id: Option<i64>,
        name: &str,
        created_by: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::workdrive, insert_folder(parent_id, name, created_by))
    }

    /// Retrieves a folder.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such folder.
    pub fn get_folder(&mut self, folder_id: i64) -> Result<FolderData, PersistenceError> {
        dispatch!(self, queries::workdrive, get_folder(folder_id))
    }

    /// Lists the folders directly inside `parent_id` (`None` is the root).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_folders(&mut self, parent_id: Option<i64>) -> Result<Vec<FolderData>, PersistenceError> {
        dispatch!(self, queries::workdrive, list_folders(parent_id))
    }

    /// Whether a sibling folder other than `excluding` already uses `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn folder_name_exists(
        &mut self,
        parent_id: Option<i64>,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<bool, PersistenceError> {
        dispatch!(
            self,
            queries::workdrive,
            folder_name_exists(parent_id, name, excluding)
        )
    }

    /// Counts a folder's direct sub-folders and documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_folder_contents(&mut self, folder_id: i64) -> Result<(i64, i64), PersistenceError> {
        dispatch!(self, queries::workdrive, count_folder_contents(folder_id))
    }

    /// Renames a folder.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such folder.
    pub fn rename_folder(&mut self, folder_id: i64, name: &str) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workdrive, rename_folder(folder_id, name))
    }

    /// Deletes a folder.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such folder.
    pub fn delete_folder(&mut self, folder_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workdrive, delete_folder(folder_id))
    }

    /// Stores a document link.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_document(&mut self, document: &NewDocument) -> Result<i64, PersistenceError> {
        dispatch!(self, mutations::workdrive, insert_document(document))
    }

    /// Retrieves a document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such document.
    pub fn get_document(&mut self, document_id: i64) -> Result<DocumentData, PersistenceError> {
        dispatch!(self, queries::workdrive, get_document(document_id))
    }

    /// Lists the documents directly inside `folder_id` (`None` is the root).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_documents(
        &mut self,
        folder_id: Option<i64>,
    ) -> Result<Vec<DocumentData>, PersistenceError> {
        dispatch!(self, queries::workdrive, list_documents(folder_id))
    }

    /// Moves a document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such document.
    pub fn move_document(
        &mut self,
        document_id: i64,
        folder_id: Option<i64>,
    ) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workdrive, move_document(document_id, folder_id))
    }

    /// Renames a document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such document.
    pub fn rename_document(&mut self, document_id: i64, name: &str) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workdrive, rename_document(document_id, name))
    }

    /// Deletes a document link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such document.
    pub fn delete_document(&mut self, document_id: i64) -> Result<(), PersistenceError> {
        dispatch!(self, mutations::workdrive, delete_document(document_id))
    }
}

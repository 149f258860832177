// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types returned by the persistence layer and input types it accepts.

use diesel::prelude::*;
use fleetdesk_domain::{
    ExpenseCategory, MaintenanceStatus, Money, ProcurementStatus, VehicleStatus,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::diesel_schema::{
    clients, deletion_log, expense_transactions, incidents, maintenance_logs, negotiation_threads,
    prepaid_accounts, procurements, vehicles, waybill_uploads, workdrive_documents,
    workdrive_folders,
};
use crate::error::PersistenceError;

fn parse_column<T: FromStr>(column: &str, raw: &str) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| {
        PersistenceError::ReconstructionError(format!("column {column}: {e}"))
    })
}

// JSON payloads stored in the job timeline.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// An operator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorData {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_disabled: bool,
    pub created_at: String,
    pub disabled_at: Option<String>,
    pub last_login_at: Option<String>,
}

/// A login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A client row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = clients)]
pub struct ClientData {
    pub client_id: i64,
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ClientData> for fleetdesk_domain::Client {
    fn from(row: ClientData) -> Self {
        Self {
            client_id: Some(row.client_id),
            name: row.name,
            company: row.company,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

/// Editable client fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientUpdate {
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A vehicle row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
pub struct VehicleData {
    pub vehicle_id: i64,
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub capacity: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl VehicleData {
    /// Parses the stored status.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is unknown.
    pub fn vehicle_status(&self) -> Result<VehicleStatus, PersistenceError> {
        parse_column("vehicles.status", &self.status)
    }
}

/// New vehicle input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub plate_number: String,
    pub make: String,
    pub model: String,
    pub capacity: Option<String>,
}

/// A driver row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverData {
    pub driver_id: i64,
    pub full_name: String,
    pub phone: String,
    pub license_number: String,
    pub vehicle_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
}

/// New driver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
    pub full_name: String,
    pub phone: String,
    pub license_number: String,
    pub vehicle_id: Option<i64>,
    pub operator_id: Option<i64>,
}

/// Filters for listing bookings. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<fleetdesk_domain::BookingStatus>,
    pub client_id: Option<i64>,
    pub driver_id: Option<i64>,
}

/// A price offer on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = negotiation_threads)]
pub struct NegotiationData {
    pub negotiation_id: i64,
    pub booking_id: i64,
    pub proposed_kobo: i64,
    pub message: Option<String>,
    pub author_operator_id: Option<i64>,
    pub created_at: String,
}

/// An uploaded waybill link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = waybill_uploads)]
pub struct WaybillData {
    pub waybill_id: i64,
    pub booking_id: i64,
    pub file_url: String,
    pub file_name: String,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: String,
}

/// An incident reported on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = incidents)]
pub struct IncidentData {
    pub incident_id: i64,
    pub booking_id: i64,
    pub description: String,
    pub severity: String,
    pub reported_by: Option<i64>,
    pub reported_at: String,
}

/// A prepaid account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = prepaid_accounts)]
pub struct PrepaidAccountData {
    pub account_id: i64,
    pub name: String,
    pub category: String,
    pub balance_kobo: i64,
    pub created_at: String,
}

impl PrepaidAccountData {
    /// Parses the stored category.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is unknown.
    pub fn expense_category(&self) -> Result<ExpenseCategory, PersistenceError> {
        parse_column("prepaid_accounts.category", &self.category)
    }

    /// The cached balance.
    #[must_use]
    pub const fn balance(&self) -> Money {
        Money::from_kobo(self.balance_kobo)
    }
}

/// A top-up row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopupData {
    pub topup_id: i64,
    pub account_id: i64,
    pub amount_kobo: i64,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub is_refund: bool,
    pub source_job_id: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// New top-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopup {
    pub account_id: i64,
    pub amount: Money,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub is_refund: bool,
    pub source_job_id: Option<String>,
    pub created_by: Option<i64>,
}

/// An expense transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = expense_transactions)]
pub struct ExpenseTransactionData {
    pub transaction_id: i64,
    pub account_id: i64,
    pub booking_id: Option<i64>,
    pub category: String,
    pub amount_kobo: i64,
    pub description: String,
    pub receipt_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
}

impl ExpenseTransactionData {
    /// Parses the stored category.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is unknown.
    pub fn expense_category(&self) -> Result<ExpenseCategory, PersistenceError> {
        parse_column("expense_transactions.category", &self.category)
    }
}

/// New expense transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpenseTransaction {
    pub account_id: i64,
    pub booking_id: Option<i64>,
    pub category: ExpenseCategory,
    pub amount: Money,
    pub description: String,
    pub receipt_url: Option<String>,
    pub created_by: Option<i64>,
}

/// Filters for listing expense transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub account_id: Option<i64>,
    pub booking_id: Option<i64>,
}

/// Outcome of recomputing an account balance from its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub account_id: i64,
    pub cached_kobo: i64,
    pub computed_kobo: i64,
    pub drift_kobo: i64,
}

/// A maintenance log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = maintenance_logs)]
pub struct MaintenanceLogData {
    pub log_id: i64,
    pub vehicle_id: i64,
    pub service_type: String,
    pub description: Option<String>,
    pub cost_kobo: i64,
    pub service_date: String,
    pub status: String,
    pub workshop: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl MaintenanceLogData {
    /// Parses the stored status.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is unknown.
    pub fn maintenance_status(&self) -> Result<MaintenanceStatus, PersistenceError> {
        parse_column("maintenance_logs.status", &self.status)
    }
}

/// New maintenance log input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenanceLog {
    pub vehicle_id: i64,
    pub service_type: String,
    pub description: Option<String>,
    pub cost: Money,
    pub service_date: String,
    pub workshop: Option<String>,
    pub created_by: Option<i64>,
}

/// A recurring maintenance schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceScheduleData {
    pub schedule_id: i64,
    pub vehicle_id: i64,
    pub service_type: String,
    pub interval_days: i32,
    pub last_service_date: String,
    pub next_due_date: String,
    pub is_active: bool,
    pub created_at: String,
}

/// New schedule input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenanceSchedule {
    pub vehicle_id: i64,
    pub service_type: String,
    pub interval_days: i32,
    pub last_service_date: String,
    pub next_due_date: String,
}

/// A procurement request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = procurements)]
pub struct ProcurementData {
    pub procurement_id: i64,
    pub title: String,
    pub vehicle_type: String,
    pub quantity: i32,
    pub estimated_cost_kobo: i64,
    pub supplier: Option<String>,
    pub justification: Option<String>,
    pub photo_url: Option<String>,
    pub status: String,
    pub requested_by: Option<i64>,
    pub decided_by: Option<i64>,
    pub decision_note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ProcurementData {
    /// Parses the stored status.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is unknown.
    pub fn procurement_status(&self) -> Result<ProcurementStatus, PersistenceError> {
        parse_column("procurements.status", &self.status)
    }
}

/// New procurement request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcurement {
    pub title: String,
    pub vehicle_type: String,
    pub quantity: i32,
    pub estimated_cost: Money,
    pub supplier: Option<String>,
    pub justification: Option<String>,
    pub photo_url: Option<String>,
    pub requested_by: Option<i64>,
}

/// A deleted booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = deletion_log)]
pub struct DeletionLogData {
    pub deletion_id: i64,
    pub booking_id: i64,
    pub job_id: String,
    pub deleted_by: Option<i64>,
    pub reason: Option<String>,
    pub booking_snapshot_json: String,
    pub refunds_json: String,
    pub deleted_at: String,
}

/// Deletion log input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeletionLog {
    pub job_id: String,
    pub deleted_by: Option<i64>,
    pub reason: Option<String>,
    pub booking_snapshot_json: String,
}

/// Row counts removed by a booking deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionSummary {
    pub deletion_id: i64,
    pub refund_topups: usize,
    pub waybills: usize,
    pub incidents: usize,
    pub negotiations: usize,
    pub expense_transactions: usize,
    pub timeline_entries: usize,
}

/// A `WorkDrive` folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = workdrive_folders)]
pub struct FolderData {
    pub folder_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// A `WorkDrive` document link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Queryable, Selectable)]
#[diesel(table_name = workdrive_documents)]
pub struct DocumentData {
    pub document_id: i64,
    pub folder_id: Option<i64>,
    pub name: String,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<i64>,
    pub created_at: String,
}

/// New document input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub folder_id: Option<i64>,
    pub name: String,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<i64>,
}

/// Moves a schedule forward after its service is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleAdvance {
    pub schedule_id: i64,
    pub last_service_date: String,
    pub next_due_date: String,
}

/// A booking as stored after a transition, with its timeline entry id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransitionResult {
    pub booking: fleetdesk::Booking,
    pub event_id: i64,
}

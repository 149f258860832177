// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Amounts arrive as Naira text the way operators type them (`"5,000.50"`)
//! and leave as [`MoneyView`], carrying both the kobo value and its
//! display form.

use fleetdesk::Booking;
use fleetdesk_domain::{
    BookingStatus, DateBucket, ExpenseCategory, Money, PaymentStatus, ScheduleState,
    format_iso_date,
};
use fleetdesk_persistence::{
    ClientData, DeletionSummary, DocumentData, DriverData, FolderData, IncidentData,
    MaintenanceLogData, ProcurementData, Reconciliation, TopupData, VehicleData, WaybillData,
};

// ========================================================================
// Shared
// ========================================================================

/// An amount as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoneyView {
    /// The amount in kobo.
    pub kobo: i64,
    /// The amount formatted as Naira, e.g. `₦5,000.00`.
    pub display: String,
}

impl From<Money> for MoneyView {
    fn from(amount: Money) -> Self {
        Self {
            kobo: amount.kobo(),
            display: amount.to_string(),
        }
    }
}

/// Whether a specific action is permitted.
///
/// Serializes as a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// What the logged-in operator may do.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalCapabilities {
    /// Create, disable and enable operators.
    pub can_manage_operators: Capability,
    /// Add vehicles and drivers.
    pub can_manage_fleet: Capability,
    /// Take, price, assign, cancel and close bookings.
    pub can_dispatch: Capability,
    /// Mark bookings paid.
    pub can_record_payment: Capability,
    /// Manage prepaid accounts.
    pub can_manage_ledger: Capability,
    /// Delete bookings.
    pub can_delete_booking: Capability,
    /// Approve or reject procurement requests.
    pub can_decide_procurement: Capability,
    /// See the dashboard and export expenses.
    pub can_view_reports: Capability,
}

/// What the logged-in operator may do to one listed operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorCapabilities {
    /// Whether this operator can be disabled.
    pub can_disable: Capability,
    /// Whether this operator can be re-enabled.
    pub can_enable: Capability,
}

/// A timeline entry as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimelineEntry {
    /// The entry id.
    pub event_id: Option<i64>,
    /// The job the entry belongs to, if any.
    pub job_id: Option<String>,
    /// The action name, e.g. `AssignDriver`.
    pub action: String,
    /// What happened, in words.
    pub details: Option<String>,
    /// Who did it.
    pub actor_display_name: String,
    /// The actor's role, lower-case.
    pub actor_type: String,
    /// Why it was done.
    pub cause: String,
    /// JSON snapshot before.
    pub before: String,
    /// JSON snapshot after.
    pub after: String,
}

impl From<&fleetdesk_audit::AuditEvent> for TimelineEntry {
    fn from(event: &fleetdesk_audit::AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            job_id: event.job_id.as_ref().map(ToString::to_string),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            actor_display_name: event.actor.display_name().to_string(),
            actor_type: event.actor.actor_type.clone(),
            cause: event.cause.description.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
        }
    }
}

// ========================================================================
// Operators and sessions
// ========================================================================

/// Whether the system still needs its first admin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BootstrapStatusResponse {
    /// True while no operators exist.
    pub is_bootstrap_mode: bool,
}

/// Request to create the first Admin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateFirstAdminRequest {
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password_confirmation: String,
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// Login name; case does not matter.
    pub login_name: String,
    /// Password.
    pub password: String,
}

/// A new session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The bearer token.
    pub session_token: String,
    /// Login name as stored.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
    /// UTC expiry, `YYYY-MM-DD HH:MM:SS`.
    pub expires_at: String,
}

/// The logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    /// Operator id.
    pub operator_id: i64,
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// What the operator may do.
    pub capabilities: GlobalCapabilities,
}

/// Request to create an operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOperatorRequest {
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// One of `Admin`, `Manager`, `Dispatcher`, `Accountant`, `Driver`.
    pub role: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password_confirmation: String,
}

/// A created operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOperatorResponse {
    /// Operator id.
    pub operator_id: i64,
    /// Login name as stored (upper-case).
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
}

/// One operator in a listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorInfo {
    /// Operator id.
    pub operator_id: i64,
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// When the operator was created.
    pub created_at: String,
    /// Last successful login.
    pub last_login_at: Option<String>,
    /// What the caller may do to this operator.
    pub capabilities: OperatorCapabilities,
}

/// All operators.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListOperatorsResponse {
    /// The operators.
    pub operators: Vec<OperatorInfo>,
}

/// Names an operator to disable or enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorStatusRequest {
    /// Operator id.
    pub operator_id: i64,
}

/// Outcome of disabling or enabling an operator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperatorStatusResponse {
    /// Operator id.
    pub operator_id: i64,
    /// The new disabled flag.
    pub is_disabled: bool,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Fleet
// ========================================================================

/// Request to add a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateVehicleRequest {
    /// Plate number.
    pub plate_number: String,
    /// Make, e.g. `MAN`.
    pub make: String,
    /// Model.
    pub model: String,
    /// Capacity, free text such as `30 tonnes`.
    pub capacity: Option<String>,
}

/// A created row: its id and a message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatedResponse {
    /// The new row's id.
    pub id: i64,
    /// The timeline entry id.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// A completed write with no new row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WriteResponse {
    /// The timeline entry id.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// Request to change a vehicle's status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateVehicleStatusRequest {
    /// Vehicle id.
    pub vehicle_id: i64,
    /// New status.
    pub status: String,
}

/// All vehicles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListVehiclesResponse {
    /// The vehicles.
    pub vehicles: Vec<VehicleData>,
}

/// Request to add a driver.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateDriverRequest {
    /// Full name.
    pub full_name: String,
    /// Phone as typed.
    pub phone: String,
    /// Licence number.
    pub license_number: String,
    /// Vehicle to pre-assign.
    pub vehicle_id: Option<i64>,
    /// The driver's operator login, for driver self-service.
    pub operator_id: Option<i64>,
}

/// All drivers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListDriversResponse {
    /// The drivers.
    pub drivers: Vec<DriverData>,
}

/// Request to pre-assign (or clear) a driver's vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignVehicleRequest {
    /// Driver id.
    pub driver_id: i64,
    /// Vehicle id; `None` clears the assignment.
    pub vehicle_id: Option<i64>,
}

// ========================================================================
// Clients
// ========================================================================

/// All clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListClientsResponse {
    /// The clients.
    pub clients: Vec<ClientData>,
}

/// One client with their bookings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GetClientResponse {
    /// The client.
    pub client: ClientData,
    /// The client's bookings, newest first.
    pub bookings: Vec<BookingInfo>,
}

/// Request to edit a client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateClientRequest {
    /// Client id.
    pub client_id: i64,
    /// Contact name.
    pub name: String,
    /// Company.
    pub company: Option<String>,
    /// Phone as typed.
    pub phone: String,
    /// Email.
    pub email: Option<String>,
    /// Address.
    pub address: Option<String>,
}

// ========================================================================
// Bookings
// ========================================================================

/// A booking intake form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingRequest {
    /// Contact name.
    pub client_name: String,
    /// Contact phone as typed.
    pub client_phone: String,
    /// Company.
    pub client_company: Option<String>,
    /// Email.
    pub client_email: Option<String>,
    /// Client address.
    pub client_address: Option<String>,
    /// Collection address.
    pub pickup_address: String,
    /// Delivery address.
    pub dropoff_address: String,
    /// Route description.
    pub route: Option<String>,
    /// What is being moved.
    pub cargo_description: String,
    /// `YYYY-MM-DD`.
    pub pickup_date: String,
    /// Naira text.
    pub budget: String,
    /// Notes.
    pub notes: Option<String>,
}

/// A created booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingResponse {
    /// Database id.
    pub booking_id: i64,
    /// Public job id.
    pub job_id: String,
    /// The client row used.
    pub client_id: i64,
    /// Whether an existing client was matched.
    pub client_reused: bool,
    /// The `CreateBooking` timeline entry.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// A booking as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingInfo {
    /// Database id.
    pub booking_id: Option<i64>,
    /// Public job id.
    pub job_id: String,
    /// Client id.
    pub client_id: i64,
    /// Collection address.
    pub pickup_address: String,
    /// Delivery address.
    pub dropoff_address: String,
    /// Route.
    pub route: Option<String>,
    /// Cargo.
    pub cargo_description: String,
    /// `YYYY-MM-DD`.
    pub pickup_date: String,
    /// Client budget.
    pub budget: MoneyView,
    /// Agreed price.
    pub agreed_amount: Option<MoneyView>,
    /// Status.
    pub status: BookingStatus,
    /// Assigned driver.
    pub driver_id: Option<i64>,
    /// Assigned vehicle.
    pub vehicle_id: Option<i64>,
    /// Fuel spend.
    pub fuel_amount: MoneyView,
    /// Ticketing spend.
    pub ticketing_amount: MoneyView,
    /// Allowance paid.
    pub allowance_amount: MoneyView,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Why it was cancelled.
    pub cancellation_reason: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Created (UTC).
    pub created_at: Option<String>,
    /// Last changed (UTC).
    pub updated_at: Option<String>,
}

impl From<&Booking> for BookingInfo {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.booking_id,
            job_id: booking.job_id.to_string(),
            client_id: booking.client_id,
            pickup_address: booking.pickup_address.clone(),
            dropoff_address: booking.dropoff_address.clone(),
            route: booking.route.clone(),
            cargo_description: booking.cargo_description.clone(),
            pickup_date: format_iso_date(booking.pickup_date),
            budget: booking.budget.into(),
            agreed_amount: booking.agreed_amount.map(MoneyView::from),
            status: booking.status,
            driver_id: booking.driver_id,
            vehicle_id: booking.vehicle_id,
            fuel_amount: booking.fuel_amount.into(),
            ticketing_amount: booking.ticketing_amount.into(),
            allowance_amount: booking.allowance_amount.into(),
            payment_status: booking.payment_status,
            cancellation_reason: booking.cancellation_reason.clone(),
            notes: booking.notes.clone(),
            created_at: booking.created_at.clone(),
            updated_at: booking.updated_at.clone(),
        }
    }
}

/// A booking with its client and side records.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GetBookingResponse {
    /// The booking.
    pub booking: BookingInfo,
    /// The client.
    pub client: ClientData,
    /// Fuel + ticketing + allowance.
    pub total_expenses: MoneyView,
    /// Uploaded waybills.
    pub waybills: Vec<WaybillData>,
    /// Reported incidents.
    pub incidents: Vec<IncidentData>,
}

/// Filters for listing bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListBookingsRequest {
    /// Status text, e.g. `In Transit`.
    pub status: Option<String>,
    /// Date bucket on creation date, e.g. `this_week`.
    pub bucket: Option<String>,
    /// Only this client's bookings.
    pub client_id: Option<i64>,
    /// Only this driver's bookings.
    pub driver_id: Option<i64>,
}

/// Matching bookings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListBookingsResponse {
    /// The bucket applied.
    pub bucket: DateBucket,
    /// The bookings, newest first.
    pub bookings: Vec<BookingInfo>,
}

/// Names a booking by job id.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JobRequest {
    /// Public job id.
    pub job_id: String,
}

/// A price offer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NegotiateBookingRequest {
    /// Public job id.
    pub job_id: String,
    /// Naira text.
    pub proposed: String,
    /// Message to go with the offer.
    pub message: Option<String>,
}

/// Agreeing a price.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApproveBookingRequest {
    /// Public job id.
    pub job_id: String,
    /// Naira text.
    pub agreed: String,
}

/// An expense to charge to a prepaid account during a workflow step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExpenseCharge {
    /// The prepaid account to debit.
    pub account_id: i64,
    /// Naira text.
    pub amount: String,
    /// Description; defaults to the category and job id.
    pub description: Option<String>,
    /// Receipt link.
    pub receipt_url: Option<String>,
}

/// Putting a driver on a job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignDriverRequest {
    /// Public job id.
    pub job_id: String,
    /// Driver id; the driver's pre-assigned vehicle goes with them.
    pub driver_id: i64,
    /// Fuel advance.
    pub fuel: Option<ExpenseCharge>,
    /// Ticketing advance.
    pub ticketing: Option<ExpenseCharge>,
    /// Driver allowance.
    pub allowance: Option<ExpenseCharge>,
}

/// A waybill link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WaybillInput {
    /// Link returned by the upload worker.
    pub file_url: String,
    /// Original file name.
    pub file_name: String,
}

/// An incident report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IncidentInput {
    /// What happened.
    pub description: String,
    /// `Low`, `Medium`, `High` or `Critical`.
    pub severity: String,
}

/// An expense charged with an explicit category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CategorizedCharge {
    /// Category.
    pub category: String,
    /// The charge.
    #[serde(flatten)]
    pub charge: ExpenseCharge,
}

/// Closing out a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct CompleteBookingRequest {
    /// Public job id.
    pub job_id: String,
    /// Signed waybills.
    #[serde(default)]
    pub waybills: Vec<WaybillInput>,
    /// Incidents on the trip.
    #[serde(default)]
    pub incidents: Vec<IncidentInput>,
    /// Spend not advanced at assignment.
    #[serde(default)]
    pub expenses: Vec<CategorizedCharge>,
}

/// Cancelling a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelBookingRequest {
    /// Public job id.
    pub job_id: String,
    /// Why.
    pub reason: String,
}

/// Outcome of a lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookingTransitionResponse {
    /// Public job id.
    pub job_id: String,
    /// Status after the step.
    pub status: BookingStatus,
    /// Payment status after the step.
    pub payment_status: PaymentStatus,
    /// The timeline entry for the step.
    pub event_id: i64,
    /// Expense transactions written.
    pub expense_transaction_ids: Vec<i64>,
    /// Categories skipped because a transaction already existed.
    pub skipped_categories: Vec<ExpenseCategory>,
    /// A success message.
    pub message: String,
}

/// A price offer as listed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NegotiationInfo {
    /// Row id.
    pub negotiation_id: i64,
    /// Offer.
    pub proposed: MoneyView,
    /// Message.
    pub message: Option<String>,
    /// Who made it.
    pub author_operator_id: Option<i64>,
    /// When.
    pub created_at: String,
}

/// Offers on a booking, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListNegotiationsResponse {
    /// Public job id.
    pub job_id: String,
    /// The offers.
    pub negotiations: Vec<NegotiationInfo>,
}

/// Uploading a waybill outside completion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadWaybillRequest {
    /// Public job id.
    pub job_id: String,
    /// The waybill.
    #[serde(flatten)]
    pub waybill: WaybillInput,
}

/// Reporting an incident outside completion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportIncidentRequest {
    /// Public job id.
    pub job_id: String,
    /// The incident.
    #[serde(flatten)]
    pub incident: IncidentInput,
}

/// Waybills on a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListWaybillsResponse {
    /// Public job id.
    pub job_id: String,
    /// The waybills.
    pub waybills: Vec<WaybillData>,
}

/// A booking's timeline, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JobTimelineResponse {
    /// Public job id.
    pub job_id: String,
    /// The entries.
    pub entries: Vec<TimelineEntry>,
}

/// Deleting a booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteBookingRequest {
    /// Public job id.
    pub job_id: String,
    /// Why.
    pub reason: Option<String>,
}

/// A refund credited by a deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefundInfo {
    /// Account credited.
    pub account_id: i64,
    /// Category.
    pub category: ExpenseCategory,
    /// Amount.
    pub amount: MoneyView,
}

/// Outcome of a deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeleteBookingResponse {
    /// Public job id.
    pub job_id: String,
    /// Refunds credited.
    pub refunds: Vec<RefundInfo>,
    /// Rows removed.
    pub summary: DeletionSummary,
    /// A success message.
    pub message: String,
}

// ========================================================================
// Prepaid ledger
// ========================================================================

/// Request to open a prepaid account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePrepaidAccountRequest {
    /// Account name, e.g. `Total Fuel Card 2`.
    pub name: String,
    /// `Fuel`, `Ticketing` or `Allowance`.
    pub category: String,
}

/// A prepaid account as listed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrepaidAccountInfo {
    /// Account id.
    pub account_id: i64,
    /// Name.
    pub name: String,
    /// Category.
    pub category: ExpenseCategory,
    /// Cached balance.
    pub balance: MoneyView,
    /// When opened.
    pub created_at: String,
}

/// All prepaid accounts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPrepaidAccountsResponse {
    /// The accounts.
    pub accounts: Vec<PrepaidAccountInfo>,
}

/// Request to add funds to an account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TopUpAccountRequest {
    /// Account id.
    pub account_id: i64,
    /// Naira text.
    pub amount: String,
    /// Bank or voucher reference.
    pub reference: Option<String>,
    /// Note.
    pub note: Option<String>,
}

/// Outcome of a top-up or expense.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LedgerWriteResponse {
    /// The new top-up or transaction id.
    pub id: i64,
    /// Account id.
    pub account_id: i64,
    /// Balance afterwards.
    pub balance: MoneyView,
    /// The timeline entry id.
    pub event_id: i64,
}

/// Request to charge an expense.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordExpenseRequest {
    /// The job the spend was for, if any.
    pub job_id: Option<String>,
    /// Category; must match the account's.
    pub category: String,
    /// The charge.
    #[serde(flatten)]
    pub charge: ExpenseCharge,
}

/// Filters for listing expense transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListExpensesRequest {
    /// Only this account.
    pub account_id: Option<i64>,
    /// Only this job.
    pub job_id: Option<String>,
}

/// An expense transaction as listed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExpenseInfo {
    /// Transaction id.
    pub transaction_id: i64,
    /// Account debited.
    pub account_id: i64,
    /// Booking, if any.
    pub booking_id: Option<i64>,
    /// Category.
    pub category: ExpenseCategory,
    /// Amount.
    pub amount: MoneyView,
    /// Description.
    pub description: String,
    /// Receipt link.
    pub receipt_url: Option<String>,
    /// When (UTC).
    pub created_at: String,
}

/// Matching expense transactions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListExpensesResponse {
    /// The transactions.
    pub transactions: Vec<ExpenseInfo>,
    /// Their sum.
    pub total: MoneyView,
}

/// Top-ups, newest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListTopupsResponse {
    /// The top-ups.
    pub topups: Vec<TopupData>,
}

/// Outcome of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReconcileAccountResponse {
    /// Raw figures.
    pub reconciliation: Reconciliation,
    /// The corrected balance.
    pub balance: MoneyView,
    /// Drift found, formatted.
    pub drift: MoneyView,
    /// The timeline entry, when drift was corrected.
    pub event_id: Option<i64>,
}

// ========================================================================
// Maintenance
// ========================================================================

/// Request to log a service visit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateMaintenanceLogRequest {
    /// Vehicle id.
    pub vehicle_id: i64,
    /// e.g. `Oil change`.
    pub service_type: String,
    /// Details.
    pub description: Option<String>,
    /// Naira text.
    pub cost: String,
    /// `YYYY-MM-DD`.
    pub service_date: String,
    /// Workshop name.
    pub workshop: Option<String>,
}

/// Request to move a service visit along.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateMaintenanceStatusRequest {
    /// Log id.
    pub log_id: i64,
    /// `Scheduled`, `In Progress` or `Completed`.
    pub status: String,
}

/// Service visits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListMaintenanceLogsResponse {
    /// The visits, newest first.
    pub logs: Vec<MaintenanceLogData>,
}

/// Request to set up a recurring service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateMaintenanceScheduleRequest {
    /// Vehicle id.
    pub vehicle_id: i64,
    /// Service type; matched against completed logs.
    pub service_type: String,
    /// Days between services.
    pub interval_days: i32,
    /// `YYYY-MM-DD`.
    pub last_service_date: String,
}

/// A schedule with its due flag.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaintenanceScheduleInfo {
    /// Schedule id.
    pub schedule_id: i64,
    /// Vehicle id.
    pub vehicle_id: i64,
    /// Service type.
    pub service_type: String,
    /// Days between services.
    pub interval_days: i32,
    /// `YYYY-MM-DD`.
    pub last_service_date: String,
    /// `YYYY-MM-DD`.
    pub next_due_date: String,
    /// Whether still active.
    pub is_active: bool,
    /// Upcoming, due soon or overdue.
    pub state: ScheduleState,
    /// True once past due.
    pub is_overdue: bool,
}

/// Schedules.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListMaintenanceSchedulesResponse {
    /// The schedules, soonest due first.
    pub schedules: Vec<MaintenanceScheduleInfo>,
}

// ========================================================================
// Procurement
// ========================================================================

/// Request to buy vehicles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateProcurementRequest {
    /// Short title.
    pub title: String,
    /// e.g. `Flatbed truck`.
    pub vehicle_type: String,
    /// How many.
    pub quantity: i32,
    /// Naira text.
    pub estimated_cost: String,
    /// Supplier.
    pub supplier: Option<String>,
    /// Why.
    pub justification: Option<String>,
    /// Photo link.
    pub photo_url: Option<String>,
}

/// Procurement requests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListProcurementsResponse {
    /// The requests, newest first.
    pub procurements: Vec<ProcurementData>,
}

/// Request to move a procurement request along.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateProcurementStatusRequest {
    /// Request id.
    pub procurement_id: i64,
    /// New status.
    pub status: String,
    /// Note recorded with an approval or rejection.
    pub note: Option<String>,
}

// ========================================================================
// WorkDrive
// ========================================================================

/// Request to create a folder.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateFolderRequest {
    /// Parent folder; `None` for the root.
    pub parent_id: Option<i64>,
    /// Folder name.
    pub name: String,
}

/// Request to rename a folder or document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenameRequest {
    /// Folder or document id.
    pub id: i64,
    /// New name.
    pub name: String,
}

/// A folder's contents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ListFolderResponse {
    /// The folder itself; `None` at the root.
    pub folder: Option<FolderData>,
    /// Sub-folders by name.
    pub folders: Vec<FolderData>,
    /// Documents by name.
    pub documents: Vec<DocumentData>,
}

/// Request to add a document link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AddDocumentRequest {
    /// Folder; `None` for the root.
    pub folder_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Link returned by the upload worker.
    pub file_url: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: Option<i64>,
}

/// Request to move a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoveDocumentRequest {
    /// Document id.
    pub document_id: i64,
    /// Target folder; `None` for the root.
    pub folder_id: Option<i64>,
}

// ========================================================================
// Reports
// ========================================================================

/// Booking count for one status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusCount {
    /// Status.
    pub status: BookingStatus,
    /// Bookings in it.
    pub count: usize,
}

/// Spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CategoryTotal {
    /// Category.
    pub category: ExpenseCategory,
    /// Total.
    pub amount: MoneyView,
}

/// Dashboard figures for one date bucket.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DashboardSummary {
    /// The bucket the figures cover.
    pub bucket: DateBucket,
    /// Bookings created in the bucket.
    pub total_bookings: usize,
    /// Count per status, every status listed.
    pub by_status: Vec<StatusCount>,
    /// Completed or closed bookings.
    pub delivered: usize,
    /// `delivered` as a percentage of `total_bookings`, two decimals.
    pub completion_rate: f64,
    /// Agreed price (or budget) of delivered bookings.
    pub revenue: MoneyView,
    /// Spend per category.
    pub expenses_by_category: Vec<CategoryTotal>,
    /// All spend.
    pub total_expenses: MoneyView,
}

/// Date bucket for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportRequest {
    /// e.g. `this_month`; defaults to `all`.
    pub bucket: Option<String>,
}

/// A CSV export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CsvExport {
    /// Suggested file name.
    pub file_name: String,
    /// Rows written, excluding the header.
    pub row_count: usize,
    /// The CSV text.
    pub content: String,
}

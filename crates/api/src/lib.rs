// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Fleetdesk back office.
//!
//! This crate sits between transport (the HTTP server) and the core
//! lifecycle engine. It authenticates operators, checks role permissions,
//! validates request DTOs, drives persistence, writes the job timeline,
//! and hands notifications to a [`Notifier`]. It knows nothing about HTTP.

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

mod auth;
mod capabilities;
mod error;
pub mod handlers;
mod notifier;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use capabilities::{compute_global_capabilities, compute_operator_capabilities};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use notifier::{
    Notification, NotificationError, Notifier, NullNotifier, Recipient, notify_best_effort,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddDocumentRequest, ApproveBookingRequest, AssignDriverRequest, AssignVehicleRequest,
    BookingInfo, BookingTransitionResponse, BootstrapStatusResponse, CancelBookingRequest,
    Capability, CategorizedCharge, CategoryTotal, CompleteBookingRequest, CreateBookingRequest,
    CreateBookingResponse, CreateDriverRequest, CreateFirstAdminRequest, CreateFolderRequest,
    CreateMaintenanceLogRequest, CreateMaintenanceScheduleRequest, CreateOperatorRequest,
    CreateOperatorResponse, CreatePrepaidAccountRequest, CreateProcurementRequest,
    CreateVehicleRequest, CreatedResponse, CsvExport, DashboardSummary, DeleteBookingRequest,
    DeleteBookingResponse, ExpenseCharge, ExpenseInfo, GetBookingResponse, GetClientResponse,
    GlobalCapabilities, IncidentInput, JobRequest, JobTimelineResponse, LedgerWriteResponse,
    ListBookingsRequest, ListBookingsResponse, ListClientsResponse, ListDriversResponse,
    ListExpensesRequest, ListExpensesResponse, ListFolderResponse, ListMaintenanceLogsResponse,
    ListMaintenanceSchedulesResponse, ListNegotiationsResponse, ListOperatorsResponse,
    ListPrepaidAccountsResponse, ListProcurementsResponse, ListTopupsResponse,
    ListVehiclesResponse, ListWaybillsResponse, LoginRequest, LoginResponse,
    MaintenanceScheduleInfo, MoneyView, MoveDocumentRequest, NegotiateBookingRequest,
    NegotiationInfo, OperatorCapabilities, OperatorInfo, OperatorStatusRequest,
    OperatorStatusResponse, PrepaidAccountInfo, ReconcileAccountResponse, RecordExpenseRequest,
    RefundInfo, RenameRequest, ReportIncidentRequest, ReportRequest, StatusCount, TimelineEntry,
    TopUpAccountRequest, UpdateClientRequest, UpdateMaintenanceStatusRequest,
    UpdateProcurementStatusRequest, UpdateVehicleStatusRequest, UploadWaybillRequest,
    WaybillInput, WhoAmIResponse, WriteResponse,
};

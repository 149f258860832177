// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking intake and the trip lifecycle.
//!
//! Lifecycle steps go through [`fleetdesk::apply`], which validates the
//! transition and produces the timeline entry; the handler then stores
//! both in one persistence call. Side records (offers, waybills,
//! incidents, expense transactions) are written after the transition they
//! belong to.

use fleetdesk::{Booking, Command, apply, apply_intake};
use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::{
    BookingDraft, BookingStatus, ChargedExpense, DateBucket, ExpenseCategory, Money, Refund,
    Tz, business_date, compute_refunds, parse_iso_date, today_in, validate_amount_positive,
    validate_booking_fields, validate_url,
};
use fleetdesk_persistence::{
    BookingFilter, DriverData, ExpenseFilter, NewDeletionLog, NewExpenseTransaction,
    OperatorData, Persistence, PersistTransitionResult,
};
use tracing::{debug, info};

use super::{
    booking_id_of, clean, internal, load_booking, not_found, parse_job_id, parse_money,
    persist_booking_note, require_text, snapshot,
};
use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::notifier::{Notification, Notifier, Recipient, notify_best_effort};
use crate::request_response::{
    ApproveBookingRequest, AssignDriverRequest, BookingInfo, BookingTransitionResponse,
    CancelBookingRequest, CompleteBookingRequest, CreateBookingRequest, CreateBookingResponse,
    DeleteBookingRequest, DeleteBookingResponse, ExpenseCharge, GetBookingResponse,
    IncidentInput, JobRequest, JobTimelineResponse, ListBookingsRequest, ListBookingsResponse,
    ListNegotiationsResponse, ListWaybillsResponse, MoneyView, NegotiateBookingRequest,
    NegotiationInfo, RefundInfo, ReportIncidentRequest, TimelineEntry, UploadWaybillRequest,
    WaybillInput, WriteResponse,
};

/// Accepted incident severities.
pub const INCIDENT_SEVERITIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];

pub(crate) const MANAGERS: [Recipient; 2] = [Recipient::Role(Role::Admin), Recipient::Role(Role::Manager)];

// ========================================================================
// Shared helpers
// ========================================================================

/// A validated expense charge waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingCharge {
    pub category: ExpenseCategory,
    pub account_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
}

/// Checks a charge against its prepaid account without writing anything.
///
/// The account must exist and hold funds of the charge's category.
pub(crate) fn prepare_charge(
    persistence: &mut Persistence,
    category: ExpenseCategory,
    charge: ExpenseCharge,
) -> Result<PendingCharge, ApiError> {
    let amount = parse_money("amount", &charge.amount)?;
    validate_amount_positive("amount", amount).map_err(translate_domain_error)?;

    let receipt_url = clean(charge.receipt_url);
    if let Some(url) = &receipt_url {
        validate_url(url).map_err(|e| ApiError::InvalidInput {
            field: String::from("receipt_url"),
            message: e.to_string(),
        })?;
    }

    let account = persistence
        .get_prepaid_account(charge.account_id)
        .map_err(not_found("Prepaid account"))?;
    let account_category = account
        .expense_category()
        .map_err(internal("Failed to read account category"))?;
    if account_category != category {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("account_category"),
            message: format!(
                "Account '{}' holds {account_category} funds and cannot pay for {category}",
                account.name
            ),
        });
    }

    Ok(PendingCharge {
        category,
        account_id: account.account_id,
        amount,
        description: clean(charge.description),
        receipt_url,
    })
}

impl PendingCharge {
    /// Debits the account.
    pub(crate) fn write(
        &self,
        persistence: &mut Persistence,
        booking: Option<&Booking>,
        created_by: i64,
    ) -> Result<i64, ApiError> {
        let description = self.description.clone().unwrap_or_else(|| match booking {
            Some(b) => format!("{} for {}", self.category, b.job_id),
            None => format!("{} expense", self.category),
        });
        persistence
            .insert_expense_transaction(&NewExpenseTransaction {
                account_id: self.account_id,
                booking_id: booking.and_then(|b| b.booking_id),
                category: self.category,
                amount: self.amount,
                description,
                receipt_url: self.receipt_url.clone(),
                created_by: Some(created_by),
            })
            .map_err(not_found("Prepaid account"))
    }
}

/// Sums charges per category into a `RecordExpenses` command.
fn expenses_command(charges: &[PendingCharge]) -> Result<Command, ApiError> {
    let total = |category: ExpenseCategory| {
        Money::sum(
            charges
                .iter()
                .filter(|c| c.category == category)
                .map(|c| c.amount),
        )
        .map_err(translate_domain_error)
    };
    Ok(Command::RecordExpenses {
        fuel: total(ExpenseCategory::Fuel)?,
        ticketing: total(ExpenseCategory::Ticketing)?,
        allowance: total(ExpenseCategory::Allowance)?,
    })
}

/// Applies a command and stores the result.
fn transition(
    persistence: &mut Persistence,
    booking: &Booking,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<PersistTransitionResult, ApiError> {
    let result = apply(
        booking,
        command,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )
    .map_err(translate_core_error)?;
    persistence
        .update_booking(&result)
        .map_err(not_found("Booking"))
}

/// Writes charges against a booking and adds them to its running totals.
///
/// The `RecordExpenses` transition is checked before any account is
/// debited. Returns the updated booking, the new transaction ids and the
/// `RecordExpenses` timeline entry, if one was written.
pub(crate) fn record_charges(
    persistence: &mut Persistence,
    booking: Booking,
    charges: &[PendingCharge],
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<(Booking, Vec<i64>, Option<i64>), ApiError> {
    if charges.is_empty() {
        return Ok((booking, Vec::new(), None));
    }
    let result = apply(
        &booking,
        expenses_command(charges)?,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )
    .map_err(translate_core_error)?;
    let ids = charges
        .iter()
        .map(|charge| charge.write(persistence, Some(&booking), operator.operator_id))
        .collect::<Result<Vec<i64>, ApiError>>()?;
    let persisted = persistence
        .update_booking(&result)
        .map_err(not_found("Booking"))?;
    Ok((persisted.booking, ids, Some(persisted.event_id)))
}

fn transition_response(
    booking: &Booking,
    event_id: i64,
    expense_transaction_ids: Vec<i64>,
    skipped_categories: Vec<ExpenseCategory>,
    message: String,
) -> BookingTransitionResponse {
    BookingTransitionResponse {
        job_id: booking.job_id.to_string(),
        status: booking.status,
        payment_status: booking.payment_status,
        event_id,
        expense_transaction_ids,
        skipped_categories,
        message,
    }
}

/// The driver record linked to the logged-in operator, if any.
fn own_driver_id(
    persistence: &mut Persistence,
    operator: &OperatorData,
) -> Result<Option<i64>, ApiError> {
    Ok(persistence
        .get_driver_for_operator(operator.operator_id)
        .map_err(internal("Failed to look up driver"))?
        .map(|d| d.driver_id))
}

fn authorize_trip_update(
    persistence: &mut Persistence,
    booking: &Booking,
    action: &str,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> Result<(), ApiError> {
    let own = if authenticated_actor.role == Role::Driver {
        own_driver_id(persistence, operator)?
    } else {
        None
    };
    AuthorizationService::authorize_trip_update(authenticated_actor, action, booking.driver_id, own)?;
    Ok(())
}

fn driver_recipient(
    persistence: &mut Persistence,
    driver_id: Option<i64>,
) -> Result<Option<Recipient>, ApiError> {
    let Some(driver_id) = driver_id else {
        return Ok(None);
    };
    let driver = persistence
        .get_driver(driver_id)
        .map_err(not_found("Driver"))?;
    Ok(driver.operator_id.map(Recipient::Operator))
}

fn ensure_not_cancelled(booking: &Booking) -> Result<(), ApiError> {
    if booking.status == BookingStatus::Cancelled {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("booking_cancelled"),
            message: format!("Booking {} is cancelled", booking.job_id),
        });
    }
    Ok(())
}

fn check_waybill(waybill: WaybillInput) -> Result<WaybillInput, ApiError> {
    let file_url = waybill.file_url.trim().to_string();
    validate_url(&file_url).map_err(translate_domain_error)?;
    Ok(WaybillInput {
        file_url,
        file_name: require_text("file_name", &waybill.file_name)?,
    })
}

fn check_incident(incident: IncidentInput) -> Result<IncidentInput, ApiError> {
    let severity = INCIDENT_SEVERITIES
        .iter()
        .find(|s| s.eq_ignore_ascii_case(incident.severity.trim()))
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("severity"),
            message: format!(
                "Invalid severity '{}'. Must be one of: {}",
                incident.severity,
                INCIDENT_SEVERITIES.join(", ")
            ),
        })?;
    Ok(IncidentInput {
        description: require_text("description", &incident.description)?,
        severity: String::from(*severity),
    })
}

// ========================================================================
// Intake and reads
// ========================================================================

/// Takes a new booking.
///
/// The client is matched by phone number or company name and reused when
/// found; otherwise a client row is created. The booking starts `Open`
/// with a job id for today's date in `tz`. Managers are notified.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not dispatch
/// - Any intake field is invalid
/// - Today's job id sequence is exhausted
/// - Database operations fail
#[allow(clippy::too_many_arguments)]
pub fn create_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: CreateBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
    tz: Tz,
) -> Result<CreateBookingResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "create_booking")?;

    let pickup_date = parse_iso_date(request.pickup_date.trim()).map_err(|e| {
        ApiError::InvalidInput {
            field: String::from("pickup_date"),
            message: e.to_string(),
        }
    })?;
    let budget = parse_money("budget", &request.budget)?;

    let draft = BookingDraft {
        client_name: request.client_name,
        client_phone: request.client_phone,
        client_company: clean(request.client_company),
        client_email: clean(request.client_email),
        client_address: clean(request.client_address),
        pickup_address: request.pickup_address,
        dropoff_address: request.dropoff_address,
        route: clean(request.route),
        cargo_description: request.cargo_description,
        pickup_date,
        budget,
        notes: clean(request.notes),
    };
    let phone = validate_booking_fields(&draft).map_err(translate_domain_error)?;

    let today = today_in(tz).map_err(translate_domain_error)?;
    let job_id = persistence
        .generate_job_id(today)
        .map_err(not_found("Booking"))?;
    let (client_id, client_reused) = persistence
        .upsert_client_for_booking(&draft, &phone)
        .map_err(internal("Failed to save client"))?;

    let result = apply_intake(
        &draft,
        job_id,
        client_id,
        Some(operator.operator_id),
        authenticated_actor.to_audit_actor(operator),
        cause,
    )
    .map_err(translate_core_error)?;
    let persisted = persistence
        .insert_booking(&result)
        .map_err(not_found("Booking"))?;
    let booking_id = booking_id_of(&persisted.booking)?;
    let job_id = persisted.booking.job_id.to_string();

    info!(booking_id, job_id = %job_id, client_id, client_reused, "Booking created");
    notify_best_effort(
        notifier,
        &Notification::new(
            MANAGERS.to_vec(),
            "New booking",
            format!(
                "{job_id}: {} from {} to {}",
                draft.client_name.trim(),
                persisted.booking.pickup_address,
                persisted.booking.dropoff_address
            ),
        )
        .for_job(job_id.clone()),
    );

    Ok(CreateBookingResponse {
        booking_id,
        message: format!("Booking {job_id} created"),
        job_id,
        client_id,
        client_reused,
        event_id: persisted.event_id,
    })
}

/// Returns a booking with its client, waybills and incidents.
///
/// # Errors
///
/// Returns an error if the job id is malformed or unknown.
pub fn get_booking(
    persistence: &mut Persistence,
    request: &JobRequest,
) -> Result<GetBookingResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let booking_id = booking_id_of(&booking)?;
    let client = persistence
        .get_client(booking.client_id)
        .map_err(not_found("Client"))?;
    let waybills = persistence
        .list_waybills(booking_id)
        .map_err(internal("Failed to list waybills"))?;
    let incidents = persistence
        .list_incidents(booking_id)
        .map_err(internal("Failed to list incidents"))?;
    let total_expenses = booking.total_expenses().map_err(translate_domain_error)?;

    Ok(GetBookingResponse {
        booking: BookingInfo::from(&booking),
        client,
        total_expenses: total_expenses.into(),
        waybills,
        incidents,
    })
}

/// Lists bookings, newest first.
///
/// The date bucket applies to the creation date in `tz`. Drivers only
/// ever see their own trips.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the query fails.
pub fn list_bookings(
    persistence: &mut Persistence,
    request: &ListBookingsRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    tz: Tz,
) -> Result<ListBookingsResponse, ApiError> {
    let status = request
        .status
        .as_deref()
        .map(|s| s.trim().parse::<BookingStatus>())
        .transpose()
        .map_err(translate_domain_error)?;
    let bucket: DateBucket = request
        .bucket
        .as_deref()
        .map(|b| b.trim().parse::<DateBucket>())
        .transpose()
        .map_err(translate_domain_error)?
        .unwrap_or_default();

    let driver_id = if authenticated_actor.role == Role::Driver {
        match own_driver_id(persistence, operator)? {
            Some(own) => Some(own),
            None => {
                debug!(operator_id = operator.operator_id, "Driver login has no driver record");
                return Ok(ListBookingsResponse {
                    bucket,
                    bookings: Vec::new(),
                });
            }
        }
    } else {
        request.driver_id
    };

    let bookings = persistence
        .list_bookings(&BookingFilter {
            status,
            client_id: request.client_id,
            driver_id,
        })
        .map_err(internal("Failed to list bookings"))?;

    let today = today_in(tz).map_err(translate_domain_error)?;
    let mut selected = Vec::with_capacity(bookings.len());
    for booking in &bookings {
        let in_bucket = match (&booking.created_at, bucket) {
            (_, DateBucket::All) => true,
            (Some(created_at), _) => {
                let date = business_date(created_at, tz).map_err(translate_domain_error)?;
                bucket.contains(date, today)
            }
            (None, _) => false,
        };
        if in_bucket {
            selected.push(BookingInfo::from(booking));
        }
    }

    Ok(ListBookingsResponse {
        bucket,
        bookings: selected,
    })
}

// ========================================================================
// Pricing
// ========================================================================

/// Puts a price on the table and records the offer.
///
/// # Errors
///
/// Returns an error if the actor may not dispatch, the amount is invalid,
/// or the booking is past negotiation.
pub fn negotiate_booking(
    persistence: &mut Persistence,
    request: NegotiateBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "negotiate_booking")?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let proposed = parse_money("proposed", &request.proposed)?;
    let message = clean(request.message);

    let persisted = transition(
        persistence,
        &booking,
        Command::Negotiate { proposed },
        authenticated_actor,
        operator,
        cause,
    )?;
    persistence
        .insert_negotiation(
            booking_id_of(&persisted.booking)?,
            proposed,
            message.as_deref(),
            Some(operator.operator_id),
        )
        .map_err(internal("Failed to record offer"))?;

    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Offered {proposed} on {}", persisted.booking.job_id),
    ))
}

/// Lists the price offers on a booking, oldest first.
///
/// # Errors
///
/// Returns an error if the booking does not exist.
pub fn list_negotiations(
    persistence: &mut Persistence,
    request: &JobRequest,
) -> Result<ListNegotiationsResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let negotiations = persistence
        .list_negotiations(booking_id_of(&booking)?)
        .map_err(internal("Failed to list offers"))?
        .into_iter()
        .map(|n| NegotiationInfo {
            negotiation_id: n.negotiation_id,
            proposed: Money::from_kobo(n.proposed_kobo).into(),
            message: n.message,
            author_operator_id: n.author_operator_id,
            created_at: n.created_at,
        })
        .collect();

    Ok(ListNegotiationsResponse {
        job_id: booking.job_id.to_string(),
        negotiations,
    })
}

/// Agrees a price with the client.
///
/// # Errors
///
/// Returns an error if the actor may not dispatch, the amount is invalid,
/// or the booking cannot be approved from its status.
pub fn approve_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: &ApproveBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "approve_booking")?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let agreed = parse_money("agreed", &request.agreed)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::Approve { agreed },
        authenticated_actor,
        operator,
        cause,
    )?;
    let job_id = persisted.booking.job_id.to_string();
    notify_best_effort(
        notifier,
        &Notification::new(
            vec![Recipient::Role(Role::Dispatcher)],
            "Booking approved",
            format!("{job_id} agreed at {agreed}; ready for a driver"),
        )
        .for_job(job_id.clone()),
    );

    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Booking {job_id} approved at {agreed}"),
    ))
}

// ========================================================================
// Assignment and trip progress
// ========================================================================

/// Puts a driver, and the vehicle pre-assigned to them, on a booking.
///
/// Optional fuel, ticketing and allowance advances are charged to the
/// named prepaid accounts. A category already charged on this booking is
/// skipped, so retrying an assignment never double-charges. Nothing is
/// written if the driver has no vehicle or any charge is invalid.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not dispatch
/// - The driver has no vehicle, or the vehicle is unavailable
/// - A charge names an unknown account or one of the wrong category
/// - The booking cannot be assigned from its status
#[allow(clippy::too_many_lines)]
pub fn assign_driver(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: AssignDriverRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "assign_driver")?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let booking_id = booking_id_of(&booking)?;

    let driver: DriverData = persistence
        .get_driver(request.driver_id)
        .map_err(not_found("Driver"))?;
    if !driver.is_active {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("driver_active"),
            message: format!("Driver {} is not active", driver.full_name),
        });
    }
    let vehicle_id = driver.vehicle_id.ok_or_else(|| ApiError::DomainRuleViolation {
        rule: String::from("driver_has_vehicle"),
        message: format!(
            "Driver {} has no vehicle assigned; assign a vehicle first",
            driver.full_name
        ),
    })?;
    let vehicle = persistence
        .get_vehicle(vehicle_id)
        .map_err(not_found("Vehicle"))?;
    let vehicle_status = vehicle
        .vehicle_status()
        .map_err(internal("Failed to read vehicle status"))?;
    if matches!(
        vehicle_status,
        fleetdesk_domain::VehicleStatus::Retired | fleetdesk_domain::VehicleStatus::InMaintenance
    ) {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("vehicle_available"),
            message: format!("Vehicle {} is {vehicle_status}", vehicle.plate_number),
        });
    }

    let mut charges = Vec::new();
    let mut skipped = Vec::new();
    for (category, charge) in [
        (ExpenseCategory::Fuel, request.fuel),
        (ExpenseCategory::Ticketing, request.ticketing),
        (ExpenseCategory::Allowance, request.allowance),
    ] {
        let Some(charge) = charge else { continue };
        let already_charged = persistence
            .booking_has_expense_category(booking_id, category)
            .map_err(internal("Failed to check existing expenses"))?;
        if already_charged {
            debug!(booking_id, %category, "Expense already recorded, skipping");
            skipped.push(category);
            continue;
        }
        charges.push(prepare_charge(persistence, category, charge)?);
    }

    let persisted = transition(
        persistence,
        &booking,
        Command::Assign {
            driver_id: driver.driver_id,
            vehicle_id,
            driver_name: driver.full_name.clone(),
            vehicle_plate: vehicle.plate_number.clone(),
        },
        authenticated_actor,
        operator,
        cause.clone(),
    )?;
    let event_id = persisted.event_id;
    let (booking, ids, _) = record_charges(
        persistence,
        persisted.booking,
        &charges,
        authenticated_actor,
        operator,
        cause,
    )?;

    let job_id = booking.job_id.to_string();
    if let Some(operator_id) = driver.operator_id {
        notify_best_effort(
            notifier,
            &Notification::new(
                vec![Recipient::Operator(operator_id)],
                "New trip",
                format!(
                    "{job_id}: {} to {} on {} with {}",
                    booking.pickup_address,
                    booking.dropoff_address,
                    fleetdesk_domain::format_iso_date(booking.pickup_date),
                    vehicle.plate_number
                ),
            )
            .for_job(job_id.clone()),
        );
    }

    Ok(transition_response(
        &booking,
        event_id,
        ids,
        skipped,
        format!(
            "{} assigned to {job_id} with {}",
            driver.full_name, vehicle.plate_number
        ),
    ))
}

/// The driver has collected the cargo.
///
/// # Errors
///
/// Returns an error if the actor may not update this trip or the booking
/// is not assigned.
pub fn start_trip(
    persistence: &mut Persistence,
    request: &JobRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    authorize_trip_update(persistence, &booking, "start_trip", authenticated_actor, operator)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::StartTrip,
        authenticated_actor,
        operator,
        cause,
    )?;
    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Trip {} started", persisted.booking.job_id),
    ))
}

/// The cargo is on the road.
///
/// # Errors
///
/// Returns an error if the actor may not update this trip or the trip has
/// not started.
pub fn mark_in_transit(
    persistence: &mut Persistence,
    request: &JobRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    authorize_trip_update(persistence, &booking, "mark_in_transit", authenticated_actor, operator)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::MarkInTransit,
        authenticated_actor,
        operator,
        cause,
    )?;
    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("{} in transit", persisted.booking.job_id),
    ))
}

/// Marks a delivery complete with its paperwork.
///
/// Waybills, incidents and any spend not advanced at assignment are
/// recorded after the `Completed` transition. Every input is checked
/// before anything is written. Accountants are notified to invoice.
///
/// # Errors
///
/// Returns an error if the actor may not update this trip, an input is
/// invalid, or the booking cannot be completed from its status.
#[allow(clippy::too_many_lines)]
pub fn complete_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: CompleteBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    authorize_trip_update(persistence, &booking, "complete_booking", authenticated_actor, operator)?;

    let waybills = request
        .waybills
        .into_iter()
        .map(check_waybill)
        .collect::<Result<Vec<_>, _>>()?;
    let incidents = request
        .incidents
        .into_iter()
        .map(check_incident)
        .collect::<Result<Vec<_>, _>>()?;
    let mut charges = Vec::with_capacity(request.expenses.len());
    for expense in request.expenses {
        let category: ExpenseCategory = expense
            .category
            .trim()
            .parse()
            .map_err(translate_domain_error)?;
        charges.push(prepare_charge(persistence, category, expense.charge)?);
    }

    let persisted = transition(
        persistence,
        &booking,
        Command::Complete,
        authenticated_actor,
        operator,
        cause.clone(),
    )?;
    let event_id = persisted.event_id;
    let booking_id = booking_id_of(&persisted.booking)?;

    for waybill in &waybills {
        persistence
            .insert_waybill(
                booking_id,
                &waybill.file_url,
                &waybill.file_name,
                Some(operator.operator_id),
            )
            .map_err(internal("Failed to store waybill"))?;
    }
    for incident in &incidents {
        persistence
            .insert_incident(
                booking_id,
                &incident.description,
                &incident.severity,
                Some(operator.operator_id),
            )
            .map_err(internal("Failed to store incident"))?;
    }
    let (booking, ids, _) = record_charges(
        persistence,
        persisted.booking,
        &charges,
        authenticated_actor,
        operator,
        cause,
    )?;

    let job_id = booking.job_id.to_string();
    info!(
        booking_id,
        job_id = %job_id,
        waybills = waybills.len(),
        incidents = incidents.len(),
        expenses = ids.len(),
        "Booking completed"
    );
    notify_best_effort(
        notifier,
        &Notification::new(
            vec![Recipient::Role(Role::Accountant)],
            "Delivery completed",
            format!("{job_id} delivered; ready to invoice"),
        )
        .for_job(job_id.clone()),
    );
    if !incidents.is_empty() {
        notify_best_effort(
            notifier,
            &Notification::new(
                MANAGERS.to_vec(),
                "Incidents reported",
                format!("{} incident(s) reported on {job_id}", incidents.len()),
            )
            .for_job(job_id.clone()),
        );
    }

    Ok(transition_response(
        &booking,
        event_id,
        ids,
        Vec::new(),
        format!("Booking {job_id} completed"),
    ))
}

/// Closes a completed booking.
///
/// # Errors
///
/// Returns an error if the actor may not dispatch or the booking is not
/// completed.
pub fn close_booking(
    persistence: &mut Persistence,
    request: &JobRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "close_booking")?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::Close,
        authenticated_actor,
        operator,
        cause,
    )?;
    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Booking {} closed", persisted.booking.job_id),
    ))
}

/// Cancels a booking with a reason.
///
/// Managers and the assigned driver are notified.
///
/// # Errors
///
/// Returns an error if the actor may not dispatch, the reason is blank,
/// or the booking is already delivered or cancelled.
pub fn cancel_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: CancelBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor, "cancel_booking")?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::Cancel {
            reason: request.reason,
        },
        authenticated_actor,
        operator,
        cause,
    )?;

    let job_id = persisted.booking.job_id.to_string();
    let mut recipients = MANAGERS.to_vec();
    recipients.extend(driver_recipient(persistence, persisted.booking.driver_id)?);
    notify_best_effort(
        notifier,
        &Notification::new(
            recipients,
            "Booking cancelled",
            format!(
                "{job_id} cancelled: {}",
                persisted.booking.cancellation_reason.as_deref().unwrap_or_default()
            ),
        )
        .for_job(job_id.clone()),
    );

    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Booking {job_id} cancelled"),
    ))
}

/// Records client payment.
///
/// Marking a paid booking paid again succeeds and leaves it paid.
///
/// # Errors
///
/// Returns an error if the actor may not record payment or the booking is
/// cancelled.
pub fn mark_paid(
    persistence: &mut Persistence,
    request: &JobRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<BookingTransitionResponse, ApiError> {
    AuthorizationService::authorize_record_payment(authenticated_actor)?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;

    let persisted = transition(
        persistence,
        &booking,
        Command::MarkPaid,
        authenticated_actor,
        operator,
        cause,
    )?;
    Ok(transition_response(
        &persisted.booking,
        persisted.event_id,
        Vec::new(),
        Vec::new(),
        format!("Booking {} marked paid", persisted.booking.job_id),
    ))
}

// ========================================================================
// Paperwork
// ========================================================================

/// Attaches a waybill link to a booking.
///
/// # Errors
///
/// Returns an error if the actor may not update this trip, the link is
/// invalid, or the booking is cancelled.
pub fn upload_waybill(
    persistence: &mut Persistence,
    request: UploadWaybillRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    authorize_trip_update(persistence, &booking, "upload_waybill", authenticated_actor, operator)?;
    ensure_not_cancelled(&booking)?;
    let waybill = check_waybill(request.waybill)?;

    let waybill_id = persistence
        .insert_waybill(
            booking_id_of(&booking)?,
            &waybill.file_url,
            &waybill.file_name,
            Some(operator.operator_id),
        )
        .map_err(internal("Failed to store waybill"))?;
    let event_id = persist_booking_note(
        persistence,
        &booking,
        "UploadWaybill",
        format!("Waybill {} uploaded", waybill.file_name),
        StateSnapshot::new(format!(
            "{{\"waybill_id\":{waybill_id},\"file_url\":{}}}",
            serde_json::Value::String(waybill.file_url.clone())
        )),
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    Ok(WriteResponse {
        event_id,
        message: format!("Waybill {} attached to {}", waybill.file_name, booking.job_id),
    })
}

/// Lists a booking's waybills.
///
/// # Errors
///
/// Returns an error if the booking does not exist.
pub fn list_waybills(
    persistence: &mut Persistence,
    request: &JobRequest,
) -> Result<ListWaybillsResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let waybills = persistence
        .list_waybills(booking_id_of(&booking)?)
        .map_err(internal("Failed to list waybills"))?;
    Ok(ListWaybillsResponse {
        job_id: booking.job_id.to_string(),
        waybills,
    })
}

/// Reports an incident on a trip and alerts managers.
///
/// # Errors
///
/// Returns an error if the actor may not update this trip or the report
/// is invalid.
pub fn report_incident(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: ReportIncidentRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    authorize_trip_update(persistence, &booking, "report_incident", authenticated_actor, operator)?;
    let incident = check_incident(request.incident)?;

    let incident_id = persistence
        .insert_incident(
            booking_id_of(&booking)?,
            &incident.description,
            &incident.severity,
            Some(operator.operator_id),
        )
        .map_err(internal("Failed to store incident"))?;
    let event_id = persist_booking_note(
        persistence,
        &booking,
        "ReportIncident",
        format!("{} incident: {}", incident.severity, incident.description),
        StateSnapshot::new(format!(
            "{{\"incident_id\":{incident_id},\"severity\":\"{}\"}}",
            incident.severity
        )),
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    let job_id = booking.job_id.to_string();
    notify_best_effort(
        notifier,
        &Notification::new(
            MANAGERS.to_vec(),
            format!("{} incident", incident.severity),
            format!("{job_id}: {}", incident.description),
        )
        .for_job(job_id.clone()),
    );

    Ok(WriteResponse {
        event_id,
        message: format!("Incident reported on {job_id}"),
    })
}

/// Returns a booking's timeline, oldest first.
///
/// # Errors
///
/// Returns an error if the booking does not exist.
pub fn get_job_timeline(
    persistence: &mut Persistence,
    request: &JobRequest,
) -> Result<JobTimelineResponse, ApiError> {
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let events = persistence
        .get_job_timeline(booking_id_of(&booking)?)
        .map_err(internal("Failed to load timeline"))?;
    Ok(JobTimelineResponse {
        job_id: booking.job_id.to_string(),
        entries: events.iter().map(TimelineEntry::from).collect(),
    })
}

// ========================================================================
// Deletion
// ========================================================================

/// Deletes a booking and everything hanging off it.
///
/// Expense transactions on the booking are refunded to their accounts as
/// one refund top-up per account. The booking snapshot and
/// refunds are kept in the deletion log. Admin or Manager only; any other
/// role is refused before anything is read.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or Manager, the booking
/// does not exist, or the cascade fails (in which case nothing is
/// removed).
pub fn delete_booking(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    request: DeleteBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<DeleteBookingResponse, ApiError> {
    AuthorizationService::authorize_delete_booking(authenticated_actor)?;
    let booking = load_booking(persistence, &parse_job_id(&request.job_id)?)?;
    let booking_id = booking_id_of(&booking)?;

    let charged = persistence
        .list_expense_transactions(ExpenseFilter {
            account_id: None,
            booking_id: Some(booking_id),
        })
        .map_err(internal("Failed to list expenses"))?
        .into_iter()
        .map(|t| {
            Ok(ChargedExpense {
                account_id: t.account_id,
                category: t
                    .expense_category()
                    .map_err(internal("Failed to read expense category"))?,
                amount: Money::from_kobo(t.amount_kobo),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    let refunds: Vec<Refund> = compute_refunds(&charged).map_err(translate_domain_error)?;

    let reason = clean(request.reason);
    let snapshot_json = serde_json::to_string(&booking).map_err(|e| ApiError::Internal {
        message: format!("Failed to snapshot booking: {e}"),
    })?;
    let deletion = NewDeletionLog {
        job_id: booking.job_id.to_string(),
        deleted_by: Some(operator.operator_id),
        reason: reason.clone(),
        booking_snapshot_json: snapshot_json,
    };
    let event = fleetdesk_audit::AuditEvent::new(
        authenticated_actor.to_audit_actor(operator),
        cause,
        fleetdesk_audit::Action::new(
            String::from("DeleteBooking"),
            Some(match &reason {
                Some(reason) => format!("Booking {} deleted: {reason}", booking.job_id),
                None => format!("Booking {} deleted", booking.job_id),
            }),
        ),
        snapshot(&booking)?,
        StateSnapshot::empty(),
        None,
        booking.job_id.clone(),
    );

    let summary = persistence
        .delete_booking_cascade(booking_id, &refunds, &deletion, &event)
        .map_err(not_found("Booking"))?;

    let job_id = booking.job_id.to_string();
    info!(booking_id, job_id = %job_id, refunds = refunds.len(), "Booking deleted");
    notify_best_effort(
        notifier,
        &Notification::new(
            MANAGERS.to_vec(),
            "Booking deleted",
            format!("{job_id} deleted by {}", operator.display_name),
        )
        .for_job(job_id.clone()),
    );

    Ok(DeleteBookingResponse {
        refunds: refunds
            .iter()
            .map(|r| RefundInfo {
                account_id: r.account_id,
                category: r.category,
                amount: MoneyView::from(r.amount),
            })
            .collect(),
        summary,
        message: format!("Booking {job_id} deleted"),
        job_id,
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Booking, TransitionResult};
use fleetdesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fleetdesk_domain::{
    BookingDraft, BookingStatus, DomainError, JobId, Money, PaymentStatus,
    validate_amount_non_negative, validate_amount_positive, validate_booking_fields,
    validate_non_empty,
};

fn require_transition(booking: &Booking, target: BookingStatus) -> Result<(), CoreError> {
    if booking.status.can_transition_to(target) {
        Ok(())
    } else {
        Err(CoreError::DomainViolation(
            DomainError::InvalidBookingTransition {
                from: booking.status.to_string(),
                to: target.to_string(),
            },
        ))
    }
}

fn build_event(
    before: &Booking,
    after: &Booking,
    action: Action,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    Ok(AuditEvent::new(
        actor,
        cause,
        action,
        before.to_snapshot()?,
        after.to_snapshot()?,
        after.booking_id,
        after.job_id.clone(),
    ))
}

/// Creates the `Open` booking for an intake form.
///
/// The job id and client id are resolved by the caller; this only checks
/// the form and builds the booking and its `CreateBooking` timeline entry.
///
/// # Errors
///
/// Returns an error if any intake field is invalid.
pub fn apply_intake(
    draft: &BookingDraft,
    job_id: JobId,
    client_id: i64,
    created_by: Option<i64>,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    validate_booking_fields(draft)?;

    let booking = Booking {
        booking_id: None,
        job_id: job_id.clone(),
        client_id,
        pickup_address: draft.pickup_address.trim().to_string(),
        dropoff_address: draft.dropoff_address.trim().to_string(),
        route: draft.route.clone().filter(|r| !r.trim().is_empty()),
        cargo_description: draft.cargo_description.trim().to_string(),
        pickup_date: draft.pickup_date,
        budget: draft.budget,
        agreed_amount: None,
        status: BookingStatus::Open,
        driver_id: None,
        vehicle_id: None,
        fuel_amount: Money::ZERO,
        ticketing_amount: Money::ZERO,
        allowance_amount: Money::ZERO,
        payment_status: PaymentStatus::Unpaid,
        cancellation_reason: None,
        notes: draft.notes.clone().filter(|n| !n.trim().is_empty()),
        created_by,
        created_at: None,
        updated_at: None,
    };

    let action = Action::new(
        String::from("CreateBooking"),
        Some(format!(
            "Booking {job_id} created for {} ({} to {})",
            draft.client_name.trim(),
            booking.pickup_address,
            booking.dropoff_address
        )),
    );
    let audit_event = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        booking.to_snapshot()?,
        None,
        job_id,
    );

    Ok(TransitionResult {
        booking,
        audit_event,
    })
}

/// Applies a command to a booking.
///
/// This is a pure function. On success it returns the new booking and
/// exactly one timeline entry; on failure the booking is untouched.
///
/// # Errors
///
/// Returns an error if the command is not allowed from the booking's
/// current status or its arguments are invalid.
#[allow(clippy::too_many_lines)]
pub fn apply(
    booking: &Booking,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let action_name = String::from(command.action_name());
    let mut next: Booking = booking.clone();

    let details: String = match command {
        Command::Negotiate { proposed } => {
            validate_amount_positive("proposed", proposed)?;
            // Counter-offers keep the booking in negotiation.
            if booking.status != BookingStatus::Negotiation {
                require_transition(booking, BookingStatus::Negotiation)?;
            }
            next.status = BookingStatus::Negotiation;
            format!("Price proposed: {proposed}")
        }
        Command::Approve { agreed } => {
            validate_amount_positive("agreed", agreed)?;
            require_transition(booking, BookingStatus::Approved)?;
            next.status = BookingStatus::Approved;
            next.agreed_amount = Some(agreed);
            format!("Price agreed: {agreed}")
        }
        Command::Assign {
            driver_id,
            vehicle_id,
            driver_name,
            vehicle_plate,
        } => {
            require_transition(booking, BookingStatus::Assigned)?;
            next.status = BookingStatus::Assigned;
            next.driver_id = Some(driver_id);
            next.vehicle_id = Some(vehicle_id);
            if booking.status == BookingStatus::Assigned {
                format!("Reassigned to {driver_name} with {vehicle_plate}")
            } else {
                format!("Assigned {driver_name} with {vehicle_plate}")
            }
        }
        Command::StartTrip => {
            require_transition(booking, BookingStatus::InProgress)?;
            next.status = BookingStatus::InProgress;
            String::from("Trip started")
        }
        Command::MarkInTransit => {
            require_transition(booking, BookingStatus::InTransit)?;
            next.status = BookingStatus::InTransit;
            String::from("Cargo in transit")
        }
        Command::Complete => {
            require_transition(booking, BookingStatus::Completed)?;
            next.status = BookingStatus::Completed;
            String::from("Delivery completed")
        }
        Command::Close => {
            require_transition(booking, BookingStatus::Closed)?;
            next.status = BookingStatus::Closed;
            String::from("Booking closed")
        }
        Command::Cancel { reason } => {
            validate_non_empty("reason", &reason)?;
            require_transition(booking, BookingStatus::Cancelled)?;
            next.status = BookingStatus::Cancelled;
            let reason = reason.trim().to_string();
            let details = format!("Cancelled: {reason}");
            next.cancellation_reason = Some(reason);
            details
        }
        Command::MarkPaid => {
            if booking.status == BookingStatus::Cancelled {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidBookingTransition {
                        from: booking.status.to_string(),
                        to: String::from("Paid"),
                    },
                ));
            }
            next.payment_status = PaymentStatus::Paid;
            if booking.payment_status == PaymentStatus::Paid {
                String::from("Payment already recorded")
            } else {
                String::from("Payment received")
            }
        }
        Command::RecordExpenses {
            fuel,
            ticketing,
            allowance,
        } => {
            validate_amount_non_negative("fuel", fuel)?;
            validate_amount_non_negative("ticketing", ticketing)?;
            validate_amount_non_negative("allowance", allowance)?;
            if !matches!(
                booking.status,
                BookingStatus::Assigned
                    | BookingStatus::InProgress
                    | BookingStatus::InTransit
                    | BookingStatus::Completed
            ) {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidBookingTransition {
                        from: booking.status.to_string(),
                        to: String::from("expenses recorded"),
                    },
                ));
            }
            next.fuel_amount = booking.fuel_amount.checked_add(fuel)?;
            next.ticketing_amount = booking.ticketing_amount.checked_add(ticketing)?;
            next.allowance_amount = booking.allowance_amount.checked_add(allowance)?;
            format!("Expenses recorded: fuel {fuel}, ticketing {ticketing}, allowance {allowance}")
        }
    };

    let audit_event = build_event(
        booking,
        &next,
        Action::new(action_name, Some(details)),
        actor,
        cause,
    )?;

    Ok(TransitionResult {
        booking: next,
        audit_event,
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle maintenance logs and recurring schedules.

use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::{
    MaintenanceStatus, Tz, VehicleStatus, format_iso_date, is_overdue, next_due_date,
    parse_iso_date, schedule_state, today_in, validate_amount_non_negative,
};
use fleetdesk_persistence::{
    MaintenanceLogData, MaintenanceScheduleData, NewMaintenanceLog, NewMaintenanceSchedule,
    OperatorData, Persistence, ScheduleAdvance,
};
use tracing::info;

use super::{GlobalEntry, clean, internal, not_found, parse_money, require_text, snapshot};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    CreateMaintenanceLogRequest, CreateMaintenanceScheduleRequest, CreatedResponse,
    ListMaintenanceLogsResponse, ListMaintenanceSchedulesResponse, MaintenanceScheduleInfo,
    UpdateMaintenanceStatusRequest, WriteResponse,
};

fn parse_date(field: &str, raw: &str) -> Result<time::Date, ApiError> {
    parse_iso_date(raw.trim()).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: e.to_string(),
    })
}

fn load_log(persistence: &mut Persistence, log_id: i64) -> Result<MaintenanceLogData, ApiError> {
    persistence
        .get_maintenance_log(log_id)
        .map_err(not_found("Maintenance log"))
}

/// Logs a service visit for a vehicle, starting `Scheduled`.
///
/// # Errors
///
/// Returns an error if the actor may not manage maintenance, a field is
/// invalid, or the vehicle does not exist.
pub fn create_maintenance_log(
    persistence: &mut Persistence,
    request: CreateMaintenanceLogRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_maintenance(authenticated_actor, "create_maintenance_log")?;

    let service_type = require_text("service_type", &request.service_type)?;
    let cost = parse_money("cost", &request.cost)?;
    validate_amount_non_negative("cost", cost).map_err(translate_domain_error)?;
    let service_date = parse_date("service_date", &request.service_date)?;
    let vehicle = persistence
        .get_vehicle(request.vehicle_id)
        .map_err(not_found("Vehicle"))?;

    let log_id = persistence
        .insert_maintenance_log(&NewMaintenanceLog {
            vehicle_id: vehicle.vehicle_id,
            service_type: service_type.clone(),
            description: clean(request.description),
            cost,
            service_date: format_iso_date(service_date),
            workshop: clean(request.workshop),
            created_by: Some(operator.operator_id),
        })
        .map_err(internal("Failed to log maintenance"))?;
    let created = load_log(persistence, log_id)?;

    let event_id = GlobalEntry {
        action: "CreateMaintenanceLog",
        details: format!("{service_type} for {} ({cost})", vehicle.plate_number),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreatedResponse {
        id: log_id,
        event_id,
        message: format!("{service_type} logged for {}", vehicle.plate_number),
    })
}

/// Moves a service visit along.
///
/// `In Progress` takes the vehicle off the road (`In Maintenance`).
/// `Completed` returns it to `Available` and, when an active schedule
/// exists for the same vehicle and service type, advances that schedule
/// from today's date in `tz`. A completed visit cannot change again.
///
/// # Errors
///
/// Returns an error if the actor may not manage maintenance, the status is
/// unknown, the log is already completed, or the log does not exist.
pub fn update_maintenance_status(
    persistence: &mut Persistence,
    request: &UpdateMaintenanceStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
    tz: Tz,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_maintenance(
        authenticated_actor,
        "update_maintenance_status",
    )?;

    let status: MaintenanceStatus = request
        .status
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    let before = load_log(persistence, request.log_id)?;
    let current = before
        .maintenance_status()
        .map_err(internal("Failed to read maintenance status"))?;
    if current == MaintenanceStatus::Completed {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("maintenance_completed"),
            message: format!("Maintenance log {} is already completed", before.log_id),
        });
    }

    let (vehicle_status, advance) = match status {
        MaintenanceStatus::Scheduled => (None, None),
        MaintenanceStatus::InProgress => (Some(VehicleStatus::InMaintenance), None),
        MaintenanceStatus::Completed => {
            let schedule = persistence
                .find_active_schedule(before.vehicle_id, &before.service_type)
                .map_err(internal("Failed to look up schedule"))?;
            let advance = match schedule {
                Some(schedule) => {
                    let today = today_in(tz).map_err(translate_domain_error)?;
                    let next = next_due_date(today, schedule.interval_days)
                        .map_err(translate_domain_error)?;
                    Some(ScheduleAdvance {
                        schedule_id: schedule.schedule_id,
                        last_service_date: format_iso_date(today),
                        next_due_date: format_iso_date(next),
                    })
                }
                None => None,
            };
            (Some(VehicleStatus::Available), advance)
        }
    };

    persistence
        .update_maintenance_status(before.log_id, status, vehicle_status, advance.as_ref())
        .map_err(not_found("Maintenance log"))?;
    let after = load_log(persistence, before.log_id)?;

    let mut details = format!(
        "{} on vehicle {}: {current} -> {status}",
        before.service_type, before.vehicle_id
    );
    if let Some(advance) = &advance {
        details.push_str(&format!("; next due {}", advance.next_due_date));
    }
    let event_id = GlobalEntry {
        action: "UpdateMaintenanceStatus",
        details: details.clone(),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    info!(log_id = before.log_id, %status, "Maintenance status updated");
    Ok(WriteResponse {
        event_id,
        message: details,
    })
}

/// Lists service visits, newest first, optionally for one vehicle.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_maintenance_logs(
    persistence: &mut Persistence,
    vehicle_id: Option<i64>,
) -> Result<ListMaintenanceLogsResponse, ApiError> {
    let logs = persistence
        .list_maintenance_logs(vehicle_id)
        .map_err(internal("Failed to list maintenance logs"))?;
    Ok(ListMaintenanceLogsResponse { logs })
}

/// Deletes a service visit.
///
/// # Errors
///
/// Returns an error if the actor may not manage maintenance or the log
/// does not exist.
pub fn delete_maintenance_log(
    persistence: &mut Persistence,
    log_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_maintenance(authenticated_actor, "delete_maintenance_log")?;

    let before = load_log(persistence, log_id)?;
    persistence
        .delete_maintenance_log(log_id)
        .map_err(not_found("Maintenance log"))?;

    let event_id = GlobalEntry {
        action: "DeleteMaintenanceLog",
        details: format!("Deleted {} log {log_id}", before.service_type),
        before: snapshot(&before)?,
        after: StateSnapshot::empty(),
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Maintenance log {log_id} deleted"),
    })
}

/// Sets up a recurring service for a vehicle.
///
/// # Errors
///
/// Returns an error if the actor may not manage maintenance, the interval
/// is not positive, the date is invalid, or the vehicle does not exist.
pub fn create_maintenance_schedule(
    persistence: &mut Persistence,
    request: &CreateMaintenanceScheduleRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_maintenance(
        authenticated_actor,
        "create_maintenance_schedule",
    )?;

    let service_type = require_text("service_type", &request.service_type)?;
    let last_service = parse_date("last_service_date", &request.last_service_date)?;
    let next_due =
        next_due_date(last_service, request.interval_days).map_err(translate_domain_error)?;
    let vehicle = persistence
        .get_vehicle(request.vehicle_id)
        .map_err(not_found("Vehicle"))?;

    let schedule_id = persistence
        .insert_maintenance_schedule(&NewMaintenanceSchedule {
            vehicle_id: vehicle.vehicle_id,
            service_type: service_type.clone(),
            interval_days: request.interval_days,
            last_service_date: format_iso_date(last_service),
            next_due_date: format_iso_date(next_due),
        })
        .map_err(internal("Failed to create schedule"))?;
    let created = persistence
        .get_maintenance_schedule(schedule_id)
        .map_err(not_found("Maintenance schedule"))?;

    let event_id = GlobalEntry {
        action: "CreateMaintenanceSchedule",
        details: format!(
            "{service_type} every {} days for {}; next due {}",
            request.interval_days,
            vehicle.plate_number,
            format_iso_date(next_due)
        ),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreatedResponse {
        id: schedule_id,
        event_id,
        message: format!("Schedule created; next due {}", format_iso_date(next_due)),
    })
}

fn schedule_info(
    schedule: MaintenanceScheduleData,
    today: time::Date,
) -> Result<MaintenanceScheduleInfo, ApiError> {
    let next_due = parse_iso_date(&schedule.next_due_date).map_err(|e| ApiError::Internal {
        message: format!("Schedule {} has a bad due date: {e}", schedule.schedule_id),
    })?;
    Ok(MaintenanceScheduleInfo {
        schedule_id: schedule.schedule_id,
        vehicle_id: schedule.vehicle_id,
        service_type: schedule.service_type,
        interval_days: schedule.interval_days,
        last_service_date: schedule.last_service_date,
        next_due_date: schedule.next_due_date,
        is_active: schedule.is_active,
        state: schedule_state(next_due, today),
        is_overdue: is_overdue(next_due, today),
    })
}

/// Lists schedules, soonest due first, flagged against today's date in
/// `tz`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_maintenance_schedules(
    persistence: &mut Persistence,
    active_only: bool,
    tz: Tz,
) -> Result<ListMaintenanceSchedulesResponse, ApiError> {
    let today = today_in(tz).map_err(translate_domain_error)?;
    let mut schedules = persistence
        .list_maintenance_schedules(active_only)
        .map_err(internal("Failed to list schedules"))?
        .into_iter()
        .map(|s| schedule_info(s, today))
        .collect::<Result<Vec<_>, _>>()?;
    schedules.sort_by(|a, b| a.next_due_date.cmp(&b.next_due_date));
    Ok(ListMaintenanceSchedulesResponse { schedules })
}

/// Stops a schedule from being reported as due.
///
/// # Errors
///
/// Returns an error if the actor may not manage maintenance or the
/// schedule does not exist.
pub fn deactivate_maintenance_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_maintenance(
        authenticated_actor,
        "deactivate_maintenance_schedule",
    )?;

    let before = persistence
        .get_maintenance_schedule(schedule_id)
        .map_err(not_found("Maintenance schedule"))?;
    persistence
        .deactivate_maintenance_schedule(schedule_id)
        .map_err(not_found("Maintenance schedule"))?;
    let after = persistence
        .get_maintenance_schedule(schedule_id)
        .map_err(not_found("Maintenance schedule"))?;

    let event_id = GlobalEntry {
        action: "DeactivateMaintenanceSchedule",
        details: format!(
            "Stopped {} schedule for vehicle {}",
            before.service_type, before.vehicle_id
        ),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Schedule {schedule_id} deactivated"),
    })
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fleetdesk_domain::{MaintenanceStatus, VehicleStatus};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::{NewMaintenanceLog, NewMaintenanceSchedule, ScheduleAdvance};
use crate::diesel_schema::{maintenance_logs, maintenance_schedules, vehicles};
use crate::error::PersistenceError;

backend_fn! {
/// Logs a service visit as `Scheduled`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_maintenance_log(
    conn: &mut _,
    log: &NewMaintenanceLog,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(maintenance_logs::table)
        .values((
            maintenance_logs::vehicle_id.eq(log.vehicle_id),
            maintenance_logs::service_type.eq(log.service_type.trim()),
            maintenance_logs::description.eq(log.description.as_deref()),
            maintenance_logs::cost_kobo.eq(log.cost.kobo()),
            maintenance_logs::service_date.eq(&log.service_date),
            maintenance_logs::status.eq(MaintenanceStatus::Scheduled.as_str()),
            maintenance_logs::workshop.eq(log.workshop.as_deref()),
            maintenance_logs::created_by.eq(log.created_by),
            maintenance_logs::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let log_id: i64 = conn.get_last_insert_rowid()?;

    info!(log_id, vehicle_id = log.vehicle_id, "Logged maintenance");
    Ok(log_id)
}
}

backend_fn! {
/// Moves a maintenance log to `status`, together with the follow-on vehicle
/// status change and schedule advance decided by the caller.
///
/// # Errors
///
/// Returns `NotFound` if the log, vehicle, or schedule does not exist.
/// Nothing is written on error.
pub fn update_maintenance_status(
    conn: &mut _,
    log_id: i64,
    status: MaintenanceStatus,
    vehicle_status: Option<VehicleStatus>,
    schedule: Option<&ScheduleAdvance>,
) -> Result<(), PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let vehicle_id: i64 = maintenance_logs::table
            .filter(maintenance_logs::log_id.eq(log_id))
            .select(maintenance_logs::vehicle_id)
            .first(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("Maintenance log {log_id} not found")))?;

        let completed_at: Option<&str> =
            (status == MaintenanceStatus::Completed).then_some(now.as_str());
        diesel::update(maintenance_logs::table)
            .filter(maintenance_logs::log_id.eq(log_id))
            .set((
                maintenance_logs::status.eq(status.as_str()),
                maintenance_logs::completed_at.eq(completed_at),
            ))
            .execute(conn)?;

        if let Some(vehicle_status) = vehicle_status {
            diesel::update(vehicles::table)
                .filter(vehicles::vehicle_id.eq(vehicle_id))
                .set(vehicles::status.eq(vehicle_status.as_str()))
                .execute(conn)?;
        }

        if let Some(advance) = schedule {
            let advanced: usize = diesel::update(maintenance_schedules::table)
                .filter(maintenance_schedules::schedule_id.eq(advance.schedule_id))
                .set((
                    maintenance_schedules::last_service_date.eq(&advance.last_service_date),
                    maintenance_schedules::next_due_date.eq(&advance.next_due_date),
                ))
                .execute(conn)?;
            if advanced == 0 {
                return Err(PersistenceError::NotFound(format!(
                    "Maintenance schedule {} not found",
                    advance.schedule_id
                )));
            }
        }

        info!(log_id, vehicle_id, %status, "Updated maintenance status");
        Ok(())
    })
}
}

backend_fn! {
/// Deletes a maintenance log.
///
/// # Errors
///
/// Returns `NotFound` if the log does not exist.
pub fn delete_maintenance_log(conn: &mut _, log_id: i64) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(maintenance_logs::table)
        .filter(maintenance_logs::log_id.eq(log_id))
        .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::NotFound(format!("Maintenance log {log_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Creates an active recurring schedule.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_maintenance_schedule(
    conn: &mut _,
    schedule: &NewMaintenanceSchedule,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(maintenance_schedules::table)
        .values((
            maintenance_schedules::vehicle_id.eq(schedule.vehicle_id),
            maintenance_schedules::service_type.eq(schedule.service_type.trim()),
            maintenance_schedules::interval_days.eq(schedule.interval_days),
            maintenance_schedules::last_service_date.eq(&schedule.last_service_date),
            maintenance_schedules::next_due_date.eq(&schedule.next_due_date),
            maintenance_schedules::is_active.eq(1),
            maintenance_schedules::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    Ok(conn.get_last_insert_rowid()?)
}
}

backend_fn! {
/// Stops a schedule from being reported as due.
///
/// # Errors
///
/// Returns `NotFound` if the schedule does not exist.
pub fn deactivate_maintenance_schedule(
    conn: &mut _,
    schedule_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(maintenance_schedules::table)
        .filter(maintenance_schedules::schedule_id.eq(schedule_id))
        .set(maintenance_schedules::is_active.eq(0))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Maintenance schedule {schedule_id} not found"
        )));
    }
    Ok(())
}
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::data_models::{MaintenanceLogData, MaintenanceScheduleData};
use crate::diesel_schema::{maintenance_logs, maintenance_schedules};
use crate::error::PersistenceError;
use crate::rows::ScheduleRow;

backend_fn! {
/// Lists maintenance logs, most recent service first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_maintenance_logs(
    conn: &mut _,
    vehicle_id: Option<i64>,
) -> Result<Vec<MaintenanceLogData>, PersistenceError> {
    let mut query = maintenance_logs::table
        .select(MaintenanceLogData::as_select())
        .into_boxed();
    if let Some(vehicle_id) = vehicle_id {
        query = query.filter(maintenance_logs::vehicle_id.eq(vehicle_id));
    }
    Ok(query
        .order((
            maintenance_logs::service_date.desc(),
            maintenance_logs::log_id.desc(),
        ))
        .load(conn)?)
}
}

backend_fn! {
/// Retrieves a maintenance log.
///
/// # Errors
///
/// Returns `NotFound` if no log has this id.
pub fn get_maintenance_log(
    conn: &mut _,
    log_id: i64,
) -> Result<MaintenanceLogData, PersistenceError> {
    maintenance_logs::table
        .filter(maintenance_logs::log_id.eq(log_id))
        .select(MaintenanceLogData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Maintenance log {log_id} not found")))
}
}

backend_fn! {
/// Lists maintenance schedules ordered by next due date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_maintenance_schedules(
    conn: &mut _,
    active_only: bool,
) -> Result<Vec<MaintenanceScheduleData>, PersistenceError> {
    let mut query = maintenance_schedules::table
        .select(ScheduleRow::as_select())
        .into_boxed();
    if active_only {
        query = query.filter(maintenance_schedules::is_active.eq(1));
    }
    let rows: Vec<ScheduleRow> = query
        .order((
            maintenance_schedules::next_due_date.asc(),
            maintenance_schedules::schedule_id.asc(),
        ))
        .load(conn)?;
    Ok(rows.into_iter().map(MaintenanceScheduleData::from).collect())
}
}

backend_fn! {
/// Retrieves a maintenance schedule.
///
/// # Errors
///
/// Returns `NotFound` if no schedule has this id.
pub fn get_maintenance_schedule(
    conn: &mut _,
    schedule_id: i64,
) -> Result<MaintenanceScheduleData, PersistenceError> {
    maintenance_schedules::table
        .filter(maintenance_schedules::schedule_id.eq(schedule_id))
        .select(ScheduleRow::as_select())
        .first(conn)
        .optional()?
        .map(MaintenanceScheduleData::from)
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Maintenance schedule {schedule_id} not found"))
        })
}
}

backend_fn! {
/// Finds the active schedule for a vehicle and service type.
///
/// Service types are compared ignoring case.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_active_schedule(
    conn: &mut _,
    vehicle_id: i64,
    service_type: &str,
) -> Result<Option<MaintenanceScheduleData>, PersistenceError> {
    let wanted = service_type.trim().to_lowercase();
    let rows: Vec<ScheduleRow> = maintenance_schedules::table
        .filter(maintenance_schedules::vehicle_id.eq(vehicle_id))
        .filter(maintenance_schedules::is_active.eq(1))
        .order(maintenance_schedules::schedule_id.asc())
        .select(ScheduleRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .find(|row| row.service_type.trim().to_lowercase() == wanted)
        .map(MaintenanceScheduleData::from))
}
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle and driver queries.

use diesel::prelude::*;

use crate::data_models::{DriverData, VehicleData};
use crate::diesel_schema::{drivers, vehicles};
use crate::error::PersistenceError;
use crate::rows::DriverRow;

backend_fn! {
/// Lists vehicles ordered by plate number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_vehicles(conn: &mut _) -> Result<Vec<VehicleData>, PersistenceError> {
    Ok(vehicles::table
        .order(vehicles::plate_number.asc())
        .select(VehicleData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Retrieves a vehicle by id.
///
/// # Errors
///
/// Returns `NotFound` if no vehicle has this id.
pub fn get_vehicle(conn: &mut _, vehicle_id: i64) -> Result<VehicleData, PersistenceError> {
    vehicles::table
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .select(VehicleData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Vehicle {vehicle_id} not found")))
}
}

backend_fn! {
/// Lists drivers ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_drivers(conn: &mut _) -> Result<Vec<DriverData>, PersistenceError> {
    let rows: Vec<DriverRow> = drivers::table
        .order(drivers::full_name.asc())
        .select(DriverRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(DriverData::from).collect())
}
}

backend_fn! {
/// Retrieves a driver by id.
///
/// # Errors
///
/// Returns `NotFound` if no driver has this id.
pub fn get_driver(conn: &mut _, driver_id: i64) -> Result<DriverData, PersistenceError> {
    drivers::table
        .filter(drivers::driver_id.eq(driver_id))
        .select(DriverRow::as_select())
        .first(conn)
        .optional()?
        .map(DriverData::from)
        .ok_or_else(|| PersistenceError::NotFound(format!("Driver {driver_id} not found")))
}
}

backend_fn! {
/// Retrieves the driver profile linked to an operator login.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_driver_for_operator(
    conn: &mut _,
    operator_id: i64,
) -> Result<Option<DriverData>, PersistenceError> {
    Ok(drivers::table
        .filter(drivers::operator_id.eq(operator_id))
        .select(DriverRow::as_select())
        .first(conn)
        .optional()?
        .map(DriverData::from))
}
}

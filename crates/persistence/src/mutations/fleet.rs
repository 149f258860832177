// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle and driver writes.

use diesel::prelude::*;
use fleetdesk_domain::VehicleStatus;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::{NewDriver, NewVehicle};
use crate::diesel_schema::{drivers, vehicles};
use crate::error::PersistenceError;

backend_fn! {
/// Registers a vehicle as `Available`.
///
/// # Errors
///
/// Returns `Conflict` if the plate number is already registered.
pub fn insert_vehicle(conn: &mut _, vehicle: &NewVehicle) -> Result<i64, PersistenceError> {
    diesel::insert_into(vehicles::table)
        .values((
            vehicles::plate_number.eq(vehicle.plate_number.trim().to_uppercase()),
            vehicles::make.eq(vehicle.make.trim()),
            vehicles::model.eq(vehicle.model.trim()),
            vehicles::capacity.eq(vehicle.capacity.as_deref()),
            vehicles::status.eq(VehicleStatus::Available.as_str()),
            vehicles::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let vehicle_id: i64 = conn.get_last_insert_rowid()?;

    info!(vehicle_id, plate = %vehicle.plate_number, "Registered vehicle");
    Ok(vehicle_id)
}
}

backend_fn! {
/// Sets a vehicle's status.
///
/// # Errors
///
/// Returns `NotFound` if the vehicle does not exist.
pub fn update_vehicle_status(
    conn: &mut _,
    vehicle_id: i64,
    status: VehicleStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(vehicles::table)
        .filter(vehicles::vehicle_id.eq(vehicle_id))
        .set(vehicles::status.eq(status.as_str()))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Vehicle {vehicle_id} not found")));
    }
    Ok(())
}
}

backend_fn! {
/// Registers a driver.
///
/// # Errors
///
/// Returns `Conflict` if the license number is already registered.
pub fn insert_driver(conn: &mut _, driver: &NewDriver) -> Result<i64, PersistenceError> {
    diesel::insert_into(drivers::table)
        .values((
            drivers::full_name.eq(driver.full_name.trim()),
            drivers::phone.eq(&driver.phone),
            drivers::license_number.eq(driver.license_number.trim()),
            drivers::vehicle_id.eq(driver.vehicle_id),
            drivers::operator_id.eq(driver.operator_id),
            drivers::is_active.eq(1),
            drivers::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let driver_id: i64 = conn.get_last_insert_rowid()?;

    info!(driver_id, "Registered driver");
    Ok(driver_id)
}
}

backend_fn! {
/// Gives a driver a vehicle, or takes it away with `None`.
///
/// The new vehicle becomes `Assigned`; a vehicle the driver gives up goes
/// back to `Available`.
///
/// # Errors
///
/// Returns `NotFound` if the driver or vehicle does not exist.
pub fn set_driver_vehicle(
    conn: &mut _,
    driver_id: i64,
    vehicle_id: Option<i64>,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let previous: Option<i64> = drivers::table
            .filter(drivers::driver_id.eq(driver_id))
            .select(drivers::vehicle_id)
            .first::<Option<i64>>(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("Driver {driver_id} not found")))?;

        diesel::update(drivers::table)
            .filter(drivers::driver_id.eq(driver_id))
            .set(drivers::vehicle_id.eq(vehicle_id))
            .execute(conn)?;

        if let Some(old) = previous.filter(|old| Some(*old) != vehicle_id) {
            diesel::update(vehicles::table)
                .filter(vehicles::vehicle_id.eq(old))
                .set(vehicles::status.eq(VehicleStatus::Available.as_str()))
                .execute(conn)?;
        }
        if let Some(new) = vehicle_id {
            let updated: usize = diesel::update(vehicles::table)
                .filter(vehicles::vehicle_id.eq(new))
                .set(vehicles::status.eq(VehicleStatus::Assigned.as_str()))
                .execute(conn)?;
            if updated == 0 {
                return Err(PersistenceError::NotFound(format!("Vehicle {new} not found")));
            }
        }

        info!(driver_id, ?vehicle_id, "Updated driver vehicle");
        Ok(())
    })
}
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicles and drivers.

use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::{PhoneNumber, VehicleStatus};
use fleetdesk_persistence::{DriverData, NewDriver, NewVehicle, OperatorData, Persistence, VehicleData};
use tracing::info;

use super::{GlobalEntry, clean, internal, not_found, require_text, snapshot};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AssignVehicleRequest, CreateDriverRequest, CreateVehicleRequest, CreatedResponse,
    ListDriversResponse, ListVehiclesResponse, UpdateVehicleStatusRequest, WriteResponse,
};

fn load_vehicle(persistence: &mut Persistence, vehicle_id: i64) -> Result<VehicleData, ApiError> {
    persistence
        .get_vehicle(vehicle_id)
        .map_err(not_found("Vehicle"))
}

fn vehicle_status(vehicle: &VehicleData) -> Result<VehicleStatus, ApiError> {
    vehicle
        .vehicle_status()
        .map_err(internal("Failed to read vehicle status"))
}

fn ensure_not_retired(vehicle: &VehicleData) -> Result<(), ApiError> {
    if vehicle_status(vehicle)? == VehicleStatus::Retired {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("vehicle_retired"),
            message: format!("Vehicle {} is retired", vehicle.plate_number),
        });
    }
    Ok(())
}

/// Adds a vehicle to the fleet.
///
/// Plate numbers are stored upper-case and must be unique.
///
/// # Errors
///
/// Returns an error if the actor may not manage the fleet, a field is
/// blank, or the plate is already registered.
pub fn create_vehicle(
    persistence: &mut Persistence,
    request: CreateVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor)?;

    let vehicle = NewVehicle {
        plate_number: require_text("plate_number", &request.plate_number)?.to_uppercase(),
        make: require_text("make", &request.make)?,
        model: require_text("model", &request.model)?,
        capacity: clean(request.capacity),
    };
    let vehicle_id = persistence
        .insert_vehicle(&vehicle)
        .map_err(not_found("Vehicle"))?;
    let created = load_vehicle(persistence, vehicle_id)?;

    let event_id = GlobalEntry {
        action: "CreateVehicle",
        details: format!(
            "Added {} {} ({})",
            created.make, created.model, created.plate_number
        ),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    info!(vehicle_id, plate = %created.plate_number, "Vehicle added");
    Ok(CreatedResponse {
        id: vehicle_id,
        event_id,
        message: format!("Vehicle {} added", created.plate_number),
    })
}

/// Lists all vehicles.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_vehicles(persistence: &mut Persistence) -> Result<ListVehiclesResponse, ApiError> {
    let vehicles = persistence
        .list_vehicles()
        .map_err(internal("Failed to list vehicles"))?;
    Ok(ListVehiclesResponse { vehicles })
}

/// Sets a vehicle's status by hand, e.g. to retire it.
///
/// # Errors
///
/// Returns an error if the actor may not manage the fleet, the status is
/// unknown, or the vehicle does not exist.
pub fn update_vehicle_status(
    persistence: &mut Persistence,
    request: &UpdateVehicleStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor)?;

    let status: VehicleStatus = request
        .status
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    let before = load_vehicle(persistence, request.vehicle_id)?;

    persistence
        .update_vehicle_status(request.vehicle_id, status)
        .map_err(not_found("Vehicle"))?;
    let after = load_vehicle(persistence, request.vehicle_id)?;

    let event_id = GlobalEntry {
        action: "UpdateVehicleStatus",
        details: format!(
            "Vehicle {} status {} -> {status}",
            before.plate_number, before.status
        ),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: format!("Vehicle {} is now {status}", before.plate_number),
    })
}

/// Registers a driver.
///
/// # Errors
///
/// Returns an error if the actor may not manage the fleet, a field is
/// invalid, the pre-assigned vehicle does not exist or is retired, or the
/// licence number is already registered.
pub fn create_driver(
    persistence: &mut Persistence,
    request: CreateDriverRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor)?;

    let full_name = require_text("full_name", &request.full_name)?;
    let license_number = require_text("license_number", &request.license_number)?.to_uppercase();
    let phone = PhoneNumber::normalize(&request.phone).map_err(|e| ApiError::InvalidInput {
        field: String::from("phone"),
        message: e.to_string(),
    })?;
    if let Some(vehicle_id) = request.vehicle_id {
        ensure_not_retired(&load_vehicle(persistence, vehicle_id)?)?;
    }
    if let Some(operator_id) = request.operator_id {
        persistence
            .get_operator_by_id(operator_id)
            .map_err(internal("Failed to load operator"))?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Operator"),
                message: format!("Operator {operator_id} does not exist"),
            })?;
    }

    let driver_id = persistence
        .insert_driver(&NewDriver {
            full_name: full_name.clone(),
            phone: phone.as_str().to_string(),
            license_number,
            vehicle_id: request.vehicle_id,
            operator_id: request.operator_id,
        })
        .map_err(not_found("Driver"))?;
    let created = persistence
        .get_driver(driver_id)
        .map_err(not_found("Driver"))?;

    let event_id = GlobalEntry {
        action: "CreateDriver",
        details: format!("Registered driver {full_name}"),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    info!(driver_id, "Driver registered");
    Ok(CreatedResponse {
        id: driver_id,
        event_id,
        message: format!("Driver {full_name} registered"),
    })
}

/// Lists all drivers.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_drivers(persistence: &mut Persistence) -> Result<ListDriversResponse, ApiError> {
    let drivers = persistence
        .list_drivers()
        .map_err(internal("Failed to list drivers"))?;
    Ok(ListDriversResponse { drivers })
}

/// Pre-assigns a vehicle to a driver, or clears the assignment.
///
/// The vehicle goes out with the driver on every job they are assigned.
///
/// # Errors
///
/// Returns an error if the actor may not manage the fleet, the driver or
/// vehicle does not exist, or the vehicle is retired.
pub fn assign_vehicle_to_driver(
    persistence: &mut Persistence,
    request: AssignVehicleRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<WriteResponse, ApiError> {
    AuthorizationService::authorize_manage_fleet(authenticated_actor)?;

    let before: DriverData = persistence
        .get_driver(request.driver_id)
        .map_err(not_found("Driver"))?;
    let plate = match request.vehicle_id {
        Some(vehicle_id) => {
            let vehicle = load_vehicle(persistence, vehicle_id)?;
            ensure_not_retired(&vehicle)?;
            Some(vehicle.plate_number)
        }
        None => None,
    };

    persistence
        .set_driver_vehicle(request.driver_id, request.vehicle_id)
        .map_err(not_found("Driver"))?;
    let after = persistence
        .get_driver(request.driver_id)
        .map_err(not_found("Driver"))?;

    let details = plate.as_ref().map_or_else(
        || format!("Cleared vehicle for {}", before.full_name),
        |plate| format!("Assigned {plate} to {}", before.full_name),
    );
    let event_id = GlobalEntry {
        action: "AssignVehicleToDriver",
        details: details.clone(),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(WriteResponse {
        event_id,
        message: details,
    })
}

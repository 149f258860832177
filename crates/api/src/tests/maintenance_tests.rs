// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fleet and maintenance tests.

use fleetdesk_domain::{ScheduleState, format_iso_date, next_due_date, today_in};

use crate::handlers::{bookings, fleet, maintenance};
use crate::tests::helpers::{
    RecordingNotifier, create_persistence, create_test_admin, create_test_booking,
    create_test_cause, create_test_driver, create_test_operator, create_test_vehicle, lagos,
};
use crate::{
    ApiError, AssignDriverRequest, CreateMaintenanceLogRequest, CreateMaintenanceScheduleRequest,
    CreateVehicleRequest, Role, UpdateMaintenanceStatusRequest, UpdateVehicleStatusRequest,
};

fn vehicle_status(persistence: &mut fleetdesk_persistence::Persistence, vehicle_id: i64) -> String {
    persistence.get_vehicle(vehicle_id).unwrap().status
}

fn oil_change(vehicle_id: i64) -> CreateMaintenanceLogRequest {
    CreateMaintenanceLogRequest {
        vehicle_id,
        service_type: String::from("Oil change"),
        description: Some(String::from("15W-40, filters")),
        cost: String::from("65,000"),
        service_date: String::from("2026-03-02"),
        workshop: Some(String::from("Ojota Motors")),
    }
}

#[test]
fn test_create_vehicle_normalizes_plate() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);

    let vehicle_id = create_test_vehicle(&mut persistence, &admin, " lnd-452-xa ");

    let vehicle = persistence.get_vehicle(vehicle_id).unwrap();
    assert_eq!(vehicle.plate_number, "LND-452-XA");
    assert_eq!(vehicle.status, "Available");
}

#[test]
fn test_dispatcher_cannot_add_vehicles() {
    let mut persistence = create_persistence();
    let dispatcher = create_test_operator(&mut persistence, "dispatch1", Role::Dispatcher);

    let result = fleet::create_vehicle(
        &mut persistence,
        CreateVehicleRequest {
            plate_number: String::from("LND-452-XA"),
            make: String::from("MAN"),
            model: String::from("TGS"),
            capacity: None,
        },
        &dispatcher.actor,
        &dispatcher.operator,
        create_test_cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_maintenance_moves_vehicle_out_and_back_into_service() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let log_id = maintenance::create_maintenance_log(
        &mut persistence,
        oil_change(vehicle_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;

    let update = |status: &str| UpdateMaintenanceStatusRequest {
        log_id,
        status: String::from(status),
    };

    maintenance::update_maintenance_status(
        &mut persistence,
        &update("In Progress"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();
    assert_eq!(vehicle_status(&mut persistence, vehicle_id), "In Maintenance");

    maintenance::update_maintenance_status(
        &mut persistence,
        &update("Completed"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();
    assert_eq!(vehicle_status(&mut persistence, vehicle_id), "Available");

    let reopen = maintenance::update_maintenance_status(
        &mut persistence,
        &update("Scheduled"),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    );
    match reopen {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "maintenance_completed");
        }
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
}

#[test]
fn test_completing_service_advances_matching_schedule() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    maintenance::create_maintenance_schedule(
        &mut persistence,
        &CreateMaintenanceScheduleRequest {
            vehicle_id,
            service_type: String::from("Oil change"),
            interval_days: 90,
            last_service_date: String::from("2025-01-10"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    let before = maintenance::list_maintenance_schedules(&mut persistence, true, lagos()).unwrap();
    assert_eq!(before.schedules.len(), 1);
    assert_eq!(before.schedules[0].next_due_date, "2025-04-10");
    assert!(before.schedules[0].is_overdue);
    assert_eq!(before.schedules[0].state, ScheduleState::Overdue);

    let log_id = maintenance::create_maintenance_log(
        &mut persistence,
        oil_change(vehicle_id),
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;
    maintenance::update_maintenance_status(
        &mut persistence,
        &UpdateMaintenanceStatusRequest {
            log_id,
            status: String::from("Completed"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap();

    let today = today_in(lagos()).unwrap();
    let after = maintenance::list_maintenance_schedules(&mut persistence, true, lagos()).unwrap();
    assert_eq!(after.schedules[0].last_service_date, format_iso_date(today));
    assert_eq!(
        after.schedules[0].next_due_date,
        format_iso_date(next_due_date(today, 90).unwrap())
    );
    assert!(!after.schedules[0].is_overdue);
}

#[test]
fn test_schedule_interval_must_be_positive() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");

    let result = maintenance::create_maintenance_schedule(
        &mut persistence,
        &CreateMaintenanceScheduleRequest {
            vehicle_id,
            service_type: String::from("Brake check"),
            interval_days: 0,
            last_service_date: String::from("2026-01-10"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "interval_days"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_deactivated_schedule_drops_from_active_list() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let schedule_id = maintenance::create_maintenance_schedule(
        &mut persistence,
        &CreateMaintenanceScheduleRequest {
            vehicle_id,
            service_type: String::from("Tyre rotation"),
            interval_days: 60,
            last_service_date: String::from("2026-01-10"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;

    maintenance::deactivate_maintenance_schedule(
        &mut persistence,
        schedule_id,
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    let active = maintenance::list_maintenance_schedules(&mut persistence, true, lagos()).unwrap();
    let all = maintenance::list_maintenance_schedules(&mut persistence, false, lagos()).unwrap();
    assert!(active.schedules.is_empty());
    assert_eq!(all.schedules.len(), 1);
}

#[test]
fn test_vehicle_in_maintenance_cannot_be_dispatched() {
    let mut persistence = create_persistence();
    let admin = create_test_admin(&mut persistence);
    let job_id = create_test_booking(&mut persistence, &admin, "08031234567");
    let vehicle_id = create_test_vehicle(&mut persistence, &admin, "LND-452-XA");
    let driver_id = create_test_driver(&mut persistence, &admin, Some(vehicle_id), None);
    fleet::update_vehicle_status(
        &mut persistence,
        &UpdateVehicleStatusRequest {
            vehicle_id,
            status: String::from("In Maintenance"),
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    )
    .unwrap();

    let result = bookings::assign_driver(
        &mut persistence,
        &RecordingNotifier::default(),
        AssignDriverRequest {
            job_id,
            driver_id,
            fuel: None,
            ticketing: None,
            allowance: None,
        },
        &admin.actor,
        &admin.operator,
        create_test_cause(),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => assert_eq!(rule, "vehicle_available"),
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use fleetdesk_audit::Cause;
use fleetdesk_domain::{DEFAULT_TIMEZONE, Tz};
use fleetdesk_persistence::{OperatorData, Persistence};

use crate::handlers::{bookings, fleet, ledger};
use crate::{
    AssignVehicleRequest, AuthenticatedActor, CreateBookingRequest, CreateDriverRequest,
    CreatePrepaidAccountRequest, CreateVehicleRequest, Notification, NotificationError, Notifier,
    Role, TopUpAccountRequest,
};

pub const TEST_PASSWORD: &str = "Fleet-Desk-2026";

/// Captures every notification a handler sends.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A notifier whose every delivery fails.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Err(NotificationError::NoSubscribers)
    }
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub const fn lagos() -> Tz {
    DEFAULT_TIMEZONE
}

pub fn create_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// An operator stored in the database, with the actor a session for them
/// would produce.
pub struct TestOperator {
    pub actor: AuthenticatedActor,
    pub operator: OperatorData,
}

pub fn create_test_operator(persistence: &mut Persistence, login: &str, role: Role) -> TestOperator {
    let operator_id = persistence
        .create_operator(login, &format!("Test {login}"), TEST_PASSWORD, role.as_str())
        .unwrap();
    let operator = persistence.get_operator_by_id(operator_id).unwrap().unwrap();
    TestOperator {
        actor: AuthenticatedActor::new(operator.login_name.clone(), role),
        operator,
    }
}

pub fn create_test_admin(persistence: &mut Persistence) -> TestOperator {
    create_test_operator(persistence, "admin1", Role::Admin)
}

pub fn booking_request(client_name: &str, client_phone: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        client_name: String::from(client_name),
        client_phone: String::from(client_phone),
        client_company: Some(String::from("Okafor Foods Ltd")),
        client_email: None,
        client_address: None,
        pickup_address: String::from("12 Wharf Road, Apapa"),
        dropoff_address: String::from("5 Ring Road, Ibadan"),
        route: Some(String::from("Lagos-Ibadan Expressway")),
        cargo_description: String::from("40 pallets of flour"),
        pickup_date: String::from("2026-03-14"),
        budget: String::from("450,000"),
        notes: None,
    }
}

/// Creates a booking through intake and returns its job id.
pub fn create_test_booking(
    persistence: &mut Persistence,
    by: &TestOperator,
    client_phone: &str,
) -> String {
    bookings::create_booking(
        persistence,
        &RecordingNotifier::default(),
        booking_request("Chinedu Okafor", client_phone),
        &by.actor,
        &by.operator,
        create_test_cause(),
        lagos(),
    )
    .unwrap()
    .job_id
}

/// Creates a vehicle and returns its id.
pub fn create_test_vehicle(persistence: &mut Persistence, by: &TestOperator, plate: &str) -> i64 {
    fleet::create_vehicle(
        persistence,
        CreateVehicleRequest {
            plate_number: String::from(plate),
            make: String::from("MAN"),
            model: String::from("TGS 33.400"),
            capacity: Some(String::from("30 tonnes")),
        },
        &by.actor,
        &by.operator,
        create_test_cause(),
    )
    .unwrap()
    .id
}

/// Creates a driver, optionally with a pre-assigned vehicle, and returns
/// the driver id.
pub fn create_test_driver(
    persistence: &mut Persistence,
    by: &TestOperator,
    vehicle_id: Option<i64>,
    operator_id: Option<i64>,
) -> i64 {
    let driver_id = fleet::create_driver(
        persistence,
        CreateDriverRequest {
            full_name: String::from("Musa Bello"),
            phone: String::from("0802 555 0199"),
            license_number: String::from("lag-dl-88231"),
            vehicle_id: None,
            operator_id,
        },
        &by.actor,
        &by.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;
    if vehicle_id.is_some() {
        fleet::assign_vehicle_to_driver(
            persistence,
            AssignVehicleRequest {
                driver_id,
                vehicle_id,
            },
            &by.actor,
            &by.operator,
            create_test_cause(),
        )
        .unwrap();
    }
    driver_id
}

/// Opens a prepaid account, tops it up, and returns its id.
pub fn create_funded_account(
    persistence: &mut Persistence,
    by: &TestOperator,
    name: &str,
    category: &str,
    amount: &str,
) -> i64 {
    let account_id = ledger::create_prepaid_account(
        persistence,
        &CreatePrepaidAccountRequest {
            name: String::from(name),
            category: String::from(category),
        },
        &by.actor,
        &by.operator,
        create_test_cause(),
    )
    .unwrap()
    .id;
    ledger::top_up_account(
        persistence,
        TopUpAccountRequest {
            account_id,
            amount: String::from(amount),
            reference: Some(String::from("TRF-0001")),
            note: None,
        },
        &by.actor,
        &by.operator,
        create_test_cause(),
    )
    .unwrap();
    account_id
}

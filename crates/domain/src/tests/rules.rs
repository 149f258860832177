// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ChargedExpense, Client, ClientMatch, DateBucket, DomainError, ExpenseCategory, Money,
    PhoneNumber, ScheduleState, business_date, compute_refunds, is_overdue, next_due_date,
    parse_timezone, schedule_state,
};
use time::macros::date;

fn client(id: i64, phone: &str, company: Option<&str>) -> Client {
    Client {
        client_id: Some(id),
        name: format!("Client {id}"),
        company: company.map(String::from),
        phone: String::from(phone),
        email: None,
        address: None,
    }
}

#[test]
fn test_phone_normalization() {
    assert_eq!(
        PhoneNumber::normalize("+234 803 123 4567").unwrap().as_str(),
        "08031234567"
    );
    assert_eq!(
        PhoneNumber::normalize("2348031234567").unwrap().as_str(),
        "08031234567"
    );
    assert_eq!(
        PhoneNumber::normalize("(0803) 123-4567").unwrap().as_str(),
        "08031234567"
    );
    assert!(PhoneNumber::normalize("call me").is_err());
    assert!(PhoneNumber::normalize("123").is_err());
}

#[test]
fn test_client_match_prefers_phone() {
    let clients = vec![
        client(1, "0803 000 0000", Some("Dangote Haulage")),
        client(2, "+2348031234567", Some("Other Co")),
    ];
    let phone = PhoneNumber::normalize("08031234567").unwrap();

    let found = ClientMatch::find_existing(&clients, &phone, Some("Dangote Haulage")).unwrap();
    assert_eq!(found.client_id, Some(2));
}

#[test]
fn test_client_match_falls_back_to_company() {
    let clients = vec![client(1, "08030000000", Some("  Dangote Haulage "))];
    let phone = PhoneNumber::normalize("08099999999").unwrap();

    let found = ClientMatch::find_existing(&clients, &phone, Some("dangote haulage")).unwrap();
    assert_eq!(found.client_id, Some(1));
}

#[test]
fn test_client_match_ignores_blank_company() {
    let clients = vec![client(1, "08030000000", Some(""))];
    let phone = PhoneNumber::normalize("08099999999").unwrap();

    assert!(ClientMatch::find_existing(&clients, &phone, Some("  ")).is_none());
    assert!(ClientMatch::find_existing(&clients, &phone, None).is_none());
}

#[test]
fn test_refunds_sum_per_account() {
    let transactions = [
        ChargedExpense {
            account_id: 4,
            category: ExpenseCategory::Fuel,
            amount: Money::from_naira(5_000).unwrap(),
        },
        ChargedExpense {
            account_id: 4,
            category: ExpenseCategory::Fuel,
            amount: Money::from_naira(3_000).unwrap(),
        },
    ];

    let refunds = compute_refunds(&transactions).unwrap();
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0].account_id, 4);
    assert_eq!(refunds[0].amount, Money::from_naira(8_000).unwrap());
}

#[test]
fn test_refunds_one_per_distinct_account_in_id_order() {
    let transactions = [
        ChargedExpense {
            account_id: 9,
            category: ExpenseCategory::Allowance,
            amount: Money::from_kobo(100),
        },
        ChargedExpense {
            account_id: 2,
            category: ExpenseCategory::Ticketing,
            amount: Money::from_kobo(250),
        },
    ];

    let refunds = compute_refunds(&transactions).unwrap();
    let ids: Vec<i64> = refunds.iter().map(|r| r.account_id).collect();
    assert_eq!(ids, vec![2, 9]);
    assert_eq!(refunds[1].category, ExpenseCategory::Allowance);
}

#[test]
fn test_refunds_empty() {
    assert!(compute_refunds(&[]).unwrap().is_empty());
}

#[test]
fn test_date_bucket_week_starts_monday() {
    // 2026-10-15 is a Thursday.
    let today = date!(2026 - 10 - 15);
    assert!(DateBucket::ThisWeek.contains(date!(2026 - 10 - 12), today));
    assert!(DateBucket::ThisWeek.contains(date!(2026 - 10 - 18), today));
    assert!(!DateBucket::ThisWeek.contains(date!(2026 - 10 - 11), today));
    assert!(!DateBucket::ThisWeek.contains(date!(2026 - 10 - 19), today));
}

#[test]
fn test_date_bucket_month_year_today() {
    let today = date!(2026 - 10 - 15);
    assert!(DateBucket::Today.contains(today, today));
    assert!(!DateBucket::Today.contains(date!(2026 - 10 - 14), today));
    assert!(DateBucket::ThisMonth.contains(date!(2026 - 10 - 01), today));
    assert!(!DateBucket::ThisMonth.contains(date!(2025 - 10 - 15), today));
    assert!(DateBucket::ThisYear.contains(date!(2026 - 01 - 01), today));
    assert!(DateBucket::All.contains(date!(1999 - 01 - 01), today));
}

#[test]
fn test_date_bucket_parse() {
    assert_eq!("this_month".parse::<DateBucket>().unwrap(), DateBucket::ThisMonth);
    assert!(matches!(
        "fortnight".parse::<DateBucket>(),
        Err(DomainError::InvalidDateBucket(_))
    ));
}

#[test]
fn test_business_date_uses_timezone() {
    let lagos = parse_timezone("Africa/Lagos").unwrap();
    assert_eq!(
        business_date("2026-10-15 23:30:00", lagos).unwrap(),
        date!(2026 - 10 - 16)
    );
    assert_eq!(
        business_date("2026-10-15 22:59:59", lagos).unwrap(),
        date!(2026 - 10 - 15)
    );
    assert!(business_date("yesterday", lagos).is_err());
    assert!(parse_timezone("Mars/Olympus").is_err());
}

#[test]
fn test_next_due_date_and_overdue() {
    let next = next_due_date(date!(2026 - 01 - 31), 30).unwrap();
    assert_eq!(next, date!(2026 - 03 - 02));
    assert!(!is_overdue(next, date!(2026 - 03 - 02)));
    assert!(is_overdue(next, date!(2026 - 03 - 03)));
    assert_eq!(
        next_due_date(date!(2026 - 01 - 31), 0),
        Err(DomainError::InvalidInterval(0))
    );
}

#[test]
fn test_schedule_state() {
    let due = date!(2026 - 06 - 10);
    assert_eq!(schedule_state(due, date!(2026 - 05 - 01)), ScheduleState::Upcoming);
    assert_eq!(schedule_state(due, date!(2026 - 06 - 03)), ScheduleState::DueSoon);
    assert_eq!(schedule_state(due, date!(2026 - 06 - 10)), ScheduleState::DueSoon);
    assert_eq!(schedule_state(due, date!(2026 - 06 - 11)), ScheduleState::Overdue);
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard figures and expense exports.
//!
//! Bookings fall into a date bucket by their creation date and expense
//! transactions by theirs, both in the business timezone.

use std::collections::{BTreeMap, HashMap};

use fleetdesk_domain::{
    BookingStatus, DateBucket, ExpenseCategory, Money, Tz, business_date, percent_of, today_in,
};
use fleetdesk_persistence::{
    BookingFilter, ExpenseFilter, ExpenseTransactionData, Persistence,
};
use serde::Serialize;
use time::Date;
use tracing::info;

use super::internal;
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    CategoryTotal, CsvExport, DashboardSummary, ReportRequest, StatusCount,
};

fn parse_bucket(request: &ReportRequest) -> Result<DateBucket, ApiError> {
    Ok(request
        .bucket
        .as_deref()
        .map(|b| b.trim().parse::<DateBucket>())
        .transpose()
        .map_err(translate_domain_error)?
        .unwrap_or_default())
}

/// Whether a UTC timestamp falls in `bucket`.
fn in_bucket(
    timestamp: Option<&str>,
    bucket: DateBucket,
    today: Date,
    tz: Tz,
) -> Result<bool, ApiError> {
    match (timestamp, bucket) {
        (_, DateBucket::All) => Ok(true),
        (Some(ts), _) => {
            let date = business_date(ts, tz).map_err(translate_domain_error)?;
            Ok(bucket.contains(date, today))
        }
        (None, _) => Ok(false),
    }
}

fn expenses_in_bucket(
    persistence: &mut Persistence,
    bucket: DateBucket,
    today: Date,
    tz: Tz,
) -> Result<Vec<ExpenseTransactionData>, ApiError> {
    let rows = persistence
        .list_expense_transactions(ExpenseFilter::default())
        .map_err(internal("Failed to list expenses"))?;
    let mut selected = Vec::with_capacity(rows.len());
    for row in rows {
        if in_bucket(Some(&row.created_at), bucket, today, tz)? {
            selected.push(row);
        }
    }
    Ok(selected)
}

/// Builds the dashboard for a date bucket.
///
/// Revenue counts the agreed price of completed and closed bookings,
/// falling back to the client's budget when no price was agreed.
///
/// # Errors
///
/// Returns an error if the actor may not view reports, the bucket is
/// unknown, or a query fails.
pub fn dashboard_summary(
    persistence: &mut Persistence,
    request: &ReportRequest,
    authenticated_actor: &AuthenticatedActor,
    tz: Tz,
) -> Result<DashboardSummary, ApiError> {
    AuthorizationService::authorize_view_reports(authenticated_actor)?;

    let bucket = parse_bucket(request)?;
    let today = today_in(tz).map_err(translate_domain_error)?;

    let bookings = persistence
        .list_bookings(&BookingFilter::default())
        .map_err(internal("Failed to list bookings"))?;
    let mut counts: HashMap<BookingStatus, usize> = HashMap::new();
    let mut delivered = 0_usize;
    let mut revenue = Money::ZERO;
    let mut total_bookings = 0_usize;
    for booking in &bookings {
        if !in_bucket(booking.created_at.as_deref(), bucket, today, tz)? {
            continue;
        }
        total_bookings += 1;
        *counts.entry(booking.status).or_default() += 1;
        if booking.status.is_delivered() {
            delivered += 1;
            revenue = revenue
                .checked_add(booking.agreed_amount.unwrap_or(booking.budget))
                .map_err(translate_domain_error)?;
        }
    }
    let by_status = BookingStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts.get(status).copied().unwrap_or(0),
        })
        .collect();

    let mut per_category: BTreeMap<ExpenseCategory, Money> = ExpenseCategory::ALL
        .iter()
        .map(|c| (*c, Money::ZERO))
        .collect();
    for row in expenses_in_bucket(persistence, bucket, today, tz)? {
        let category = row
            .expense_category()
            .map_err(internal("Failed to read expense category"))?;
        let entry = per_category.entry(category).or_insert(Money::ZERO);
        *entry = entry
            .checked_add(Money::from_kobo(row.amount_kobo))
            .map_err(translate_domain_error)?;
    }
    let total_expenses =
        Money::sum(per_category.values().copied()).map_err(translate_domain_error)?;
    let expenses_by_category = per_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category,
            amount: amount.into(),
        })
        .collect();

    let completion_rate = percent_of(
        i64::try_from(delivered).unwrap_or(i64::MAX),
        i64::try_from(total_bookings).unwrap_or(i64::MAX),
    );

    Ok(DashboardSummary {
        bucket,
        total_bookings,
        by_status,
        delivered,
        completion_rate,
        revenue: revenue.into(),
        expenses_by_category,
        total_expenses: total_expenses.into(),
    })
}

const EXPENSE_CSV_HEADER: [&str; 7] = [
    "date",
    "job_id",
    "account",
    "category",
    "amount_naira",
    "description",
    "receipt_url",
];

/// Column order matches [`EXPENSE_CSV_HEADER`].
#[derive(Serialize)]
struct ExpenseCsvRow<'a> {
    date: &'a str,
    job_id: &'a str,
    account: &'a str,
    category: &'a str,
    amount_naira: String,
    description: &'a str,
    receipt_url: &'a str,
}

/// Exports the bucket's expense transactions as CSV, oldest first.
///
/// # Errors
///
/// Returns an error if the actor may not view reports, the bucket is
/// unknown, or a query fails.
pub fn export_expenses_csv(
    persistence: &mut Persistence,
    request: &ReportRequest,
    authenticated_actor: &AuthenticatedActor,
    tz: Tz,
) -> Result<CsvExport, ApiError> {
    AuthorizationService::authorize_view_reports(authenticated_actor)?;

    let bucket = parse_bucket(request)?;
    let today = today_in(tz).map_err(translate_domain_error)?;

    let job_ids: HashMap<i64, String> = persistence
        .list_bookings(&BookingFilter::default())
        .map_err(internal("Failed to list bookings"))?
        .into_iter()
        .filter_map(|b| b.booking_id.map(|id| (id, b.job_id.to_string())))
        .collect();
    let accounts: HashMap<i64, String> = persistence
        .list_prepaid_accounts()
        .map_err(internal("Failed to list prepaid accounts"))?
        .into_iter()
        .map(|a| (a.account_id, a.name))
        .collect();

    let mut rows = expenses_in_bucket(persistence, bucket, today, tz)?;
    rows.reverse();

    // Header written by hand so an empty bucket still yields one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(EXPENSE_CSV_HEADER)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to write CSV header: {e}"),
        })?;
    for row in &rows {
        let amount = Money::from_kobo(row.amount_kobo);
        writer
            .serialize(ExpenseCsvRow {
                date: &row.created_at,
                job_id: row
                    .booking_id
                    .and_then(|id| job_ids.get(&id))
                    .map_or("", String::as_str),
                account: accounts.get(&row.account_id).map_or("", String::as_str),
                category: &row.category,
                amount_naira: format!("{}.{:02}", amount.kobo() / 100, amount.kobo() % 100),
                description: &row.description,
                receipt_url: row.receipt_url.as_deref().unwrap_or(""),
            })
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to write CSV row: {e}"),
            })?;
    }
    let bytes = writer.into_inner().map_err(|e| ApiError::Internal {
        message: format!("Failed to finish CSV: {e}"),
    })?;
    let content = String::from_utf8(bytes).map_err(|e| ApiError::Internal {
        message: format!("CSV is not UTF-8: {e}"),
    })?;

    info!(rows = rows.len(), bucket = bucket.as_str(), "Expense CSV exported");
    Ok(CsvExport {
        file_name: format!("expenses-{}-{today}.csv", bucket.as_str()),
        row_count: rows.len(),
        content,
    })
}

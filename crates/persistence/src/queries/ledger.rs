// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepaid account, top-up, and expense transaction queries.

use diesel::prelude::*;
use fleetdesk_domain::ExpenseCategory;

use crate::data_models::{ExpenseFilter, ExpenseTransactionData, PrepaidAccountData, TopupData};
use crate::diesel_schema::{account_topups, expense_transactions, prepaid_accounts};
use crate::error::PersistenceError;
use crate::rows::TopupRow;

backend_fn! {
/// Lists prepaid accounts ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_prepaid_accounts(conn: &mut _) -> Result<Vec<PrepaidAccountData>, PersistenceError> {
    Ok(prepaid_accounts::table
        .order(prepaid_accounts::name.asc())
        .select(PrepaidAccountData::as_select())
        .load(conn)?)
}
}

backend_fn! {
/// Retrieves a prepaid account.
///
/// # Errors
///
/// Returns `NotFound` if no account has this id.
pub fn get_prepaid_account(
    conn: &mut _,
    account_id: i64,
) -> Result<PrepaidAccountData, PersistenceError> {
    prepaid_accounts::table
        .filter(prepaid_accounts::account_id.eq(account_id))
        .select(PrepaidAccountData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Prepaid account {account_id} not found")))
}
}

backend_fn! {
/// Lists top-ups, newest first, optionally for one account.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_topups(
    conn: &mut _,
    account_id: Option<i64>,
) -> Result<Vec<TopupData>, PersistenceError> {
    let mut query = account_topups::table
        .select(TopupRow::as_select())
        .into_boxed();
    if let Some(account_id) = account_id {
        query = query.filter(account_topups::account_id.eq(account_id));
    }
    let rows: Vec<TopupRow> = query.order(account_topups::topup_id.desc()).load(conn)?;
    Ok(rows.into_iter().map(TopupData::from).collect())
}
}

backend_fn! {
/// Lists expense transactions, newest first, narrowed by `filter`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_expense_transactions(
    conn: &mut _,
    filter: ExpenseFilter,
) -> Result<Vec<ExpenseTransactionData>, PersistenceError> {
    let mut query = expense_transactions::table
        .select(ExpenseTransactionData::as_select())
        .into_boxed();
    if let Some(account_id) = filter.account_id {
        query = query.filter(expense_transactions::account_id.eq(account_id));
    }
    if let Some(booking_id) = filter.booking_id {
        query = query.filter(expense_transactions::booking_id.eq(booking_id));
    }
    Ok(query
        .order(expense_transactions::transaction_id.desc())
        .load(conn)?)
}
}

backend_fn! {
/// Whether a booking already has an expense transaction in `category`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn booking_has_expense_category(
    conn: &mut _,
    booking_id: i64,
    category: ExpenseCategory,
) -> Result<bool, PersistenceError> {
    use diesel::dsl::{exists, select};

    Ok(select(exists(
        expense_transactions::table
            .filter(expense_transactions::booking_id.eq(booking_id))
            .filter(expense_transactions::category.eq(category.as_str())),
    ))
    .get_result(conn)?)
}
}

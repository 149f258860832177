// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepaid ledger writes.
//!
//! `prepaid_accounts.balance_kobo` is a cache of
//! `sum(top-ups) - sum(expense transactions)`. Every write that changes
//! either side updates the cache in the same transaction.

use diesel::prelude::*;
use fleetdesk_domain::ExpenseCategory;
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::clock;
use crate::data_models::{NewExpenseTransaction, NewTopup, Reconciliation};
use crate::diesel_schema::{account_topups, deletion_log, expense_transactions, prepaid_accounts};
use crate::error::PersistenceError;

fn checked_total(amounts: &[i64]) -> Result<i64, PersistenceError> {
    amounts
        .iter()
        .try_fold(0_i64, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(|| PersistenceError::Other(String::from("Ledger total overflowed")))
}

backend_fn! {
/// Opens a prepaid account with a zero balance.
///
/// # Errors
///
/// Returns `Conflict` if the name is taken.
pub fn insert_prepaid_account(
    conn: &mut _,
    name: &str,
    category: ExpenseCategory,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(prepaid_accounts::table)
        .values((
            prepaid_accounts::name.eq(name.trim()),
            prepaid_accounts::category.eq(category.as_str()),
            prepaid_accounts::balance_kobo.eq(0_i64),
            prepaid_accounts::created_at.eq(clock::now()?),
        ))
        .execute(conn)?;
    let account_id: i64 = conn.get_last_insert_rowid()?;

    info!(account_id, %category, "Opened prepaid account");
    Ok(account_id)
}
}

backend_fn! {
/// Credits an account.
///
/// # Errors
///
/// Returns `NotFound` if the account does not exist. Nothing is written
/// on error.
pub fn insert_topup(conn: &mut _, topup: &NewTopup) -> Result<i64, PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let credited: usize = diesel::update(prepaid_accounts::table)
            .filter(prepaid_accounts::account_id.eq(topup.account_id))
            .set(
                prepaid_accounts::balance_kobo
                    .eq(prepaid_accounts::balance_kobo + topup.amount.kobo()),
            )
            .execute(conn)?;
        if credited == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Prepaid account {} not found",
                topup.account_id
            )));
        }

        diesel::insert_into(account_topups::table)
            .values((
                account_topups::account_id.eq(topup.account_id),
                account_topups::amount_kobo.eq(topup.amount.kobo()),
                account_topups::reference.eq(topup.reference.as_deref()),
                account_topups::note.eq(topup.note.as_deref()),
                account_topups::is_refund.eq(i32::from(topup.is_refund)),
                account_topups::source_job_id.eq(topup.source_job_id.as_deref()),
                account_topups::created_by.eq(topup.created_by),
                account_topups::created_at.eq(&now),
            ))
            .execute(conn)?;
        let topup_id: i64 = conn.get_last_insert_rowid()?;

        info!(topup_id, account_id = topup.account_id, amount = %topup.amount, "Topped up account");
        Ok(topup_id)
    })
}
}

backend_fn! {
/// Debits an account for an expense.
///
/// The balance may go negative; that is logged, not refused.
///
/// # Errors
///
/// Returns `NotFound` if the account does not exist. Nothing is written
/// on error.
pub fn insert_expense_transaction(
    conn: &mut _,
    expense: &NewExpenseTransaction,
) -> Result<i64, PersistenceError> {
    let now = clock::now()?;
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let debited: usize = diesel::update(prepaid_accounts::table)
            .filter(prepaid_accounts::account_id.eq(expense.account_id))
            .set(
                prepaid_accounts::balance_kobo
                    .eq(prepaid_accounts::balance_kobo - expense.amount.kobo()),
            )
            .execute(conn)?;
        if debited == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Prepaid account {} not found",
                expense.account_id
            )));
        }

        diesel::insert_into(expense_transactions::table)
            .values((
                expense_transactions::account_id.eq(expense.account_id),
                expense_transactions::booking_id.eq(expense.booking_id),
                expense_transactions::category.eq(expense.category.as_str()),
                expense_transactions::amount_kobo.eq(expense.amount.kobo()),
                expense_transactions::description.eq(&expense.description),
                expense_transactions::receipt_url.eq(expense.receipt_url.as_deref()),
                expense_transactions::created_by.eq(expense.created_by),
                expense_transactions::created_at.eq(&now),
            ))
            .execute(conn)?;
        let transaction_id: i64 = conn.get_last_insert_rowid()?;

        let balance: i64 = prepaid_accounts::table
            .filter(prepaid_accounts::account_id.eq(expense.account_id))
            .select(prepaid_accounts::balance_kobo)
            .first(conn)?;
        if balance < 0 {
            warn!(
                account_id = expense.account_id,
                balance_kobo = balance,
                "Prepaid account overdrawn"
            );
        }

        info!(
            transaction_id,
            account_id = expense.account_id,
            booking_id = ?expense.booking_id,
            category = %expense.category,
            amount = %expense.amount,
            "Recorded expense"
        );
        Ok(transaction_id)
    })
}
}

backend_fn! {
/// Recomputes an account balance from its ledger and stores it.
///
/// The ledger balance is top-ups minus expense transactions, leaving out
/// refunds issued for deleted bookings (their charges went with them).
///
/// # Errors
///
/// Returns `NotFound` if the account does not exist.
pub fn reconcile_account(
    conn: &mut _,
    account_id: i64,
) -> Result<Reconciliation, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let cached_kobo: i64 = prepaid_accounts::table
            .filter(prepaid_accounts::account_id.eq(account_id))
            .select(prepaid_accounts::balance_kobo)
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                PersistenceError::NotFound(format!("Prepaid account {account_id} not found"))
            })?;

        let credits: Vec<i64> = account_topups::table
            .filter(account_topups::account_id.eq(account_id))
            .select(account_topups::amount_kobo)
            .load(conn)?;
        let debits: Vec<i64> = expense_transactions::table
            .filter(expense_transactions::account_id.eq(account_id))
            .select(expense_transactions::amount_kobo)
            .load(conn)?;
        // Deleting a booking removes its charges and refunds them in the
        // same step, so those refunds net out against debits that are gone.
        let settled_refunds: Vec<i64> = account_topups::table
            .filter(account_topups::account_id.eq(account_id))
            .filter(account_topups::is_refund.eq(1))
            .filter(
                account_topups::source_job_id
                    .eq_any(deletion_log::table.select(deletion_log::job_id.nullable())),
            )
            .select(account_topups::amount_kobo)
            .load(conn)?;

        let live_debits = checked_total(&debits)?;
        let computed_kobo = checked_total(&credits)?
            .checked_sub(checked_total(&settled_refunds)?)
            .and_then(|net| net.checked_sub(live_debits))
            .ok_or_else(|| PersistenceError::Other(String::from("Ledger total overflowed")))?;
        let drift_kobo = cached_kobo.saturating_sub(computed_kobo);

        if drift_kobo != 0 {
            warn!(account_id, cached_kobo, computed_kobo, "Correcting prepaid balance drift");
            diesel::update(prepaid_accounts::table)
                .filter(prepaid_accounts::account_id.eq(account_id))
                .set(prepaid_accounts::balance_kobo.eq(computed_kobo))
                .execute(conn)?;
        }

        Ok(Reconciliation {
            account_id,
            cached_kobo,
            computed_kobo,
            drift_kobo,
        })
    })
}
}

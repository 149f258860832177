// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Prepaid expense accounts.
//!
//! Each account holds funds for one category. Top-ups credit the cached
//! balance and expense transactions debit it, both inside the same
//! database transaction as the ledger row.

use fleetdesk_audit::{Cause, StateSnapshot};
use fleetdesk_domain::{ExpenseCategory, Money, validate_amount_positive};
use fleetdesk_persistence::{
    ExpenseFilter, ExpenseTransactionData, NewTopup, OperatorData, Persistence,
    PrepaidAccountData,
};
use tracing::{info, warn};

use super::bookings::{prepare_charge, record_charges};
use super::{
    GlobalEntry, clean, internal, load_booking, not_found, parse_job_id, parse_money,
    require_text, snapshot,
};
use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    CreatePrepaidAccountRequest, CreatedResponse, ExpenseInfo, LedgerWriteResponse,
    ListExpensesRequest, ListExpensesResponse, ListPrepaidAccountsResponse, ListTopupsResponse,
    MoneyView, PrepaidAccountInfo, ReconcileAccountResponse, RecordExpenseRequest,
    TopUpAccountRequest,
};

fn load_account(
    persistence: &mut Persistence,
    account_id: i64,
) -> Result<PrepaidAccountData, ApiError> {
    persistence
        .get_prepaid_account(account_id)
        .map_err(not_found("Prepaid account"))
}

fn account_info(account: PrepaidAccountData) -> Result<PrepaidAccountInfo, ApiError> {
    let category = account
        .expense_category()
        .map_err(internal("Failed to read account category"))?;
    Ok(PrepaidAccountInfo {
        account_id: account.account_id,
        balance: account.balance().into(),
        name: account.name,
        category,
        created_at: account.created_at,
    })
}

fn expense_info(row: ExpenseTransactionData) -> Result<ExpenseInfo, ApiError> {
    let category = row
        .expense_category()
        .map_err(internal("Failed to read expense category"))?;
    Ok(ExpenseInfo {
        transaction_id: row.transaction_id,
        account_id: row.account_id,
        booking_id: row.booking_id,
        category,
        amount: Money::from_kobo(row.amount_kobo).into(),
        description: row.description,
        receipt_url: row.receipt_url,
        created_at: row.created_at,
    })
}

/// Opens a prepaid account.
///
/// # Errors
///
/// Returns an error if the actor may not manage the ledger, the category
/// is unknown, or the name is taken.
pub fn create_prepaid_account(
    persistence: &mut Persistence,
    request: &CreatePrepaidAccountRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CreatedResponse, ApiError> {
    AuthorizationService::authorize_manage_ledger(authenticated_actor, "create_prepaid_account")?;

    let name = require_text("name", &request.name)?;
    let category: ExpenseCategory = request
        .category
        .trim()
        .parse()
        .map_err(translate_domain_error)?;

    let account_id = persistence
        .insert_prepaid_account(&name, category)
        .map_err(not_found("Prepaid account"))?;
    let created = load_account(persistence, account_id)?;

    let event_id = GlobalEntry {
        action: "CreatePrepaidAccount",
        details: format!("Opened {category} account {name}"),
        before: StateSnapshot::empty(),
        after: snapshot(&created)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(CreatedResponse {
        id: account_id,
        event_id,
        message: format!("Account {name} opened"),
    })
}

/// Lists prepaid accounts with their balances.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_prepaid_accounts(
    persistence: &mut Persistence,
) -> Result<ListPrepaidAccountsResponse, ApiError> {
    let accounts = persistence
        .list_prepaid_accounts()
        .map_err(internal("Failed to list prepaid accounts"))?
        .into_iter()
        .map(account_info)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ListPrepaidAccountsResponse { accounts })
}

/// Adds funds to an account.
///
/// # Errors
///
/// Returns an error if the actor may not manage the ledger, the amount is
/// not positive, or the account does not exist.
pub fn top_up_account(
    persistence: &mut Persistence,
    request: TopUpAccountRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<LedgerWriteResponse, ApiError> {
    AuthorizationService::authorize_manage_ledger(authenticated_actor, "top_up_account")?;

    let amount = parse_money("amount", &request.amount)?;
    validate_amount_positive("amount", amount).map_err(translate_domain_error)?;
    let before = load_account(persistence, request.account_id)?;

    let topup_id = persistence
        .insert_topup(&NewTopup {
            account_id: request.account_id,
            amount,
            reference: clean(request.reference),
            note: clean(request.note),
            is_refund: false,
            source_job_id: None,
            created_by: Some(operator.operator_id),
        })
        .map_err(not_found("Prepaid account"))?;
    let after = load_account(persistence, request.account_id)?;

    let event_id = GlobalEntry {
        action: "TopUpAccount",
        details: format!("Topped up {} by {amount}", after.name),
        before: snapshot(&before)?,
        after: snapshot(&after)?,
        actor: authenticated_actor,
        operator,
    }
    .persist(persistence, cause)?;

    Ok(LedgerWriteResponse {
        id: topup_id,
        account_id: after.account_id,
        balance: after.balance().into(),
        event_id,
    })
}

/// Charges an expense to a prepaid account.
///
/// With a job id, the spend is also added to the booking's running totals
/// and recorded on its timeline; the booking must be assigned, on the
/// road or completed.
///
/// # Errors
///
/// Returns an error if the actor may not record expenses, the charge is
/// invalid, or the booking cannot take expenses.
pub fn record_expense(
    persistence: &mut Persistence,
    request: RecordExpenseRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<LedgerWriteResponse, ApiError> {
    AuthorizationService::authorize_record_expense(authenticated_actor)?;

    let category: ExpenseCategory = request
        .category
        .trim()
        .parse()
        .map_err(translate_domain_error)?;
    let booking = match request.job_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(load_booking(persistence, &parse_job_id(raw)?)?),
        _ => None,
    };
    let charge = prepare_charge(persistence, category, request.charge)?;
    let account_id = charge.account_id;

    let (transaction_id, event_id) = match booking {
        Some(booking) => {
            let (_, ids, event_id) = record_charges(
                persistence,
                booking,
                std::slice::from_ref(&charge),
                authenticated_actor,
                operator,
                cause,
            )?;
            let transaction_id = ids.first().copied().ok_or_else(|| ApiError::Internal {
                message: String::from("Expense transaction missing after insert"),
            })?;
            let event_id = event_id.ok_or_else(|| ApiError::Internal {
                message: String::from("Expense timeline entry missing after insert"),
            })?;
            (transaction_id, event_id)
        }
        None => {
            let before = load_account(persistence, account_id)?;
            let transaction_id = charge.write(persistence, None, operator.operator_id)?;
            let after = load_account(persistence, account_id)?;
            let event_id = GlobalEntry {
                action: "RecordExpense",
                details: format!("{category} expense of {} from {}", charge.amount, after.name),
                before: snapshot(&before)?,
                after: snapshot(&after)?,
                actor: authenticated_actor,
                operator,
            }
            .persist(persistence, cause)?;
            (transaction_id, event_id)
        }
    };

    let account = load_account(persistence, account_id)?;
    Ok(LedgerWriteResponse {
        id: transaction_id,
        account_id,
        balance: account.balance().into(),
        event_id,
    })
}

/// Lists expense transactions, newest first, with their total.
///
/// # Errors
///
/// Returns an error if the job id is unknown or the query fails.
pub fn list_expense_transactions(
    persistence: &mut Persistence,
    request: &ListExpensesRequest,
) -> Result<ListExpensesResponse, ApiError> {
    let booking_id = match request.job_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            load_booking(persistence, &parse_job_id(raw)?)?.booking_id
        }
        _ => None,
    };
    let rows = persistence
        .list_expense_transactions(ExpenseFilter {
            account_id: request.account_id,
            booking_id,
        })
        .map_err(internal("Failed to list expenses"))?;

    let total = Money::sum(rows.iter().map(|r| Money::from_kobo(r.amount_kobo)))
        .map_err(translate_domain_error)?;
    let transactions = rows
        .into_iter()
        .map(expense_info)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListExpensesResponse {
        transactions,
        total: total.into(),
    })
}

/// Lists top-ups, newest first, optionally for one account.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_topups(
    persistence: &mut Persistence,
    account_id: Option<i64>,
) -> Result<ListTopupsResponse, ApiError> {
    let topups = persistence
        .list_topups(account_id)
        .map_err(internal("Failed to list top-ups"))?;
    Ok(ListTopupsResponse { topups })
}

/// Recomputes an account balance from its ledger and corrects drift.
///
/// A timeline row is written only when the cached balance was wrong.
///
/// # Errors
///
/// Returns an error if the actor may not manage the ledger or the account
/// does not exist.
pub fn reconcile_account(
    persistence: &mut Persistence,
    account_id: i64,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<ReconcileAccountResponse, ApiError> {
    AuthorizationService::authorize_manage_ledger(authenticated_actor, "reconcile_account")?;

    let before = load_account(persistence, account_id)?;
    let reconciliation = persistence
        .reconcile_account(account_id)
        .map_err(not_found("Prepaid account"))?;

    let event_id = if reconciliation.drift_kobo == 0 {
        info!(account_id, "Prepaid balance reconciled, no drift");
        None
    } else {
        warn!(
            account_id,
            drift_kobo = reconciliation.drift_kobo,
            "Prepaid balance drift corrected"
        );
        let after = load_account(persistence, account_id)?;
        Some(
            GlobalEntry {
                action: "ReconcileAccount",
                details: format!(
                    "Corrected {} from {} to {}",
                    after.name,
                    before.balance(),
                    after.balance()
                ),
                before: snapshot(&before)?,
                after: snapshot(&after)?,
                actor: authenticated_actor,
                operator,
            }
            .persist(persistence, cause)?,
        )
    };

    Ok(ReconcileAccountResponse {
        balance: MoneyView::from(Money::from_kobo(reconciliation.computed_kobo)),
        drift: MoneyView::from(Money::from_kobo(reconciliation.drift_kobo)),
        reconciliation,
        event_id,
    })
}

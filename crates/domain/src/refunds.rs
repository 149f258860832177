// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Refunds issued when a booking with recorded expenses is deleted.

use crate::error::DomainError;
use crate::money::Money;
use crate::types::ExpenseCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An expense transaction charged to a prepaid account for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargedExpense {
    /// The prepaid account that was debited.
    pub account_id: i64,
    /// The spend category.
    pub category: ExpenseCategory,
    /// The amount debited.
    pub amount: Money,
}

/// Money returned to one prepaid account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// The account credited.
    pub account_id: i64,
    /// Category of the first transaction seen on the account.
    pub category: ExpenseCategory,
    /// Sum of all amounts charged to the account.
    pub amount: Money,
}

/// Aggregates charged expenses into one refund per distinct account.
///
/// Refunds are ordered by account id. Accounts whose charges sum to zero
/// produce no refund.
///
/// # Errors
///
/// Returns `AmountOverflow` if a per-account total overflows.
pub fn compute_refunds(transactions: &[ChargedExpense]) -> Result<Vec<Refund>, DomainError> {
    let mut per_account: BTreeMap<i64, Refund> = BTreeMap::new();

    for tx in transactions {
        match per_account.get_mut(&tx.account_id) {
            Some(refund) => refund.amount = refund.amount.checked_add(tx.amount)?,
            None => {
                per_account.insert(
                    tx.account_id,
                    Refund {
                        account_id: tx.account_id,
                        category: tx.category,
                        amount: tx.amount,
                    },
                );
            }
        }
    }

    Ok(per_account
        .into_values()
        .filter(|refund| refund.amount != Money::ZERO)
        .collect())
}

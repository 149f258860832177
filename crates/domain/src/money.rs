// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Naira amounts stored as integer kobo.

use crate::error::DomainError;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

const KOBO_PER_NAIRA: i64 = 100;

/// A monetary amount in kobo (1/100 Naira).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero Naira.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a kobo count.
    #[must_use]
    pub const fn from_kobo(kobo: i64) -> Self {
        Self(kobo)
    }

    /// Creates an amount from whole Naira.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the value does not fit in kobo.
    pub const fn from_naira(naira: i64) -> Result<Self, DomainError> {
        match naira.checked_mul(KOBO_PER_NAIRA) {
            Some(kobo) => Ok(Self(kobo)),
            None => Err(DomainError::AmountOverflow),
        }
    }

    /// Parses a user-entered Naira amount such as `5,000.50`, `₦1200` or `-30`.
    ///
    /// At most two decimal places are accepted. Thousands separators and a
    /// leading `₦` or `NGN` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for malformed input and `AmountOverflow` when
    /// the value does not fit.
    pub fn from_naira_str(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidAmount(raw.to_string());

        let trimmed = raw.trim();
        let (negative, unsigned) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest.trim_start()));
        let unsigned = unsigned
            .strip_prefix('₦')
            .or_else(|| unsigned.strip_prefix("NGN"))
            .unwrap_or(unsigned)
            .trim();
        let cleaned: String = unsigned.chars().filter(|c| *c != ',').collect();

        let (whole, fraction) = cleaned
            .split_once('.')
            .map_or((cleaned.as_str(), ""), |(w, f)| (w, f));

        if whole.is_empty() || fraction.len() > 2 {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let naira: i64 = whole.parse().map_err(|_| DomainError::AmountOverflow)?;
        let kobo_part: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid())?,
        };

        let total = naira
            .checked_mul(KOBO_PER_NAIRA)
            .and_then(|k| k.checked_add(kobo_part))
            .ok_or(DomainError::AmountOverflow)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Returns the amount in kobo.
    #[must_use]
    pub const fn kobo(self) -> i64 {
        self.0
    }

    /// Returns true when the amount is greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true when the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` on overflow.
    pub const fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        match self.0.checked_add(other.0) {
            Some(kobo) => Ok(Self(kobo)),
            None => Err(DomainError::AmountOverflow),
        }
    }

    /// Subtracts `other` from this amount.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` on overflow.
    pub const fn checked_sub(self, other: Self) -> Result<Self, DomainError> {
        match self.0.checked_sub(other.0) {
            Some(kobo) => Ok(Self(kobo)),
            None => Err(DomainError::AmountOverflow),
        }
    }

    /// Sums a sequence of amounts.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` on overflow.
    pub fn sum<I>(amounts: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let naira = magnitude / 100;
        let kobo = magnitude % 100;

        let digits = naira.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{sign}₦{grouped}.{kobo:02}")
    }
}

/// Returns `part` as a percentage of `whole`, rounded to two decimals.
///
/// A zero `whole` yields `0.0`.
#[must_use]
pub fn percent_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let part = part.to_f64().unwrap_or(0.0);
    let whole = whole.to_f64().unwrap_or(1.0);
    (part / whole * 10_000.0).round() / 100.0
}

// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client identity and intake deduplication.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A phone number in local Nigerian form (`0803...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    value: String,
}

impl PhoneNumber {
    /// Normalizes a phone number as typed into a form.
    ///
    /// Spaces, dashes, dots and parentheses are dropped. The `+234` and
    /// `234` country prefixes become a leading `0`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhoneNumber` if nothing but digits remains or fewer
    /// than seven digits are present.
    pub fn normalize(raw: &str) -> Result<Self, DomainError> {
        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();

        let local = if let Some(rest) = compact.strip_prefix("+234") {
            format!("0{rest}")
        } else if let Some(rest) = compact.strip_prefix("234").filter(|r| r.len() >= 10) {
            format!("0{rest}")
        } else if let Some(rest) = compact.strip_prefix('+') {
            rest.to_string()
        } else {
            compact
        };

        if local.len() < 7 || !local.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPhoneNumber(raw.to_string()));
        }

        Ok(Self { value: local })
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// A client as known to the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Database id; `None` until persisted.
    pub client_id: Option<i64>,
    /// Contact name.
    pub name: String,
    /// Company name, if any.
    pub company: Option<String>,
    /// Phone as stored.
    pub phone: String,
    /// Email, if any.
    pub email: Option<String>,
    /// Address, if any.
    pub address: Option<String>,
}

fn company_key(company: &str) -> Option<String> {
    let key = company.trim().to_lowercase();
    if key.is_empty() { None } else { Some(key) }
}

/// Finds the client an intake form refers to.
pub struct ClientMatch;

impl ClientMatch {
    /// Returns the first client whose normalized phone equals `phone`,
    /// otherwise the first whose company matches `company` ignoring case
    /// and surrounding whitespace.
    #[must_use]
    pub fn find_existing<'a>(
        clients: &'a [Client],
        phone: &PhoneNumber,
        company: Option<&str>,
    ) -> Option<&'a Client> {
        let by_phone = clients.iter().find(|client| {
            PhoneNumber::normalize(&client.phone).is_ok_and(|stored| &stored == phone)
        });
        if by_phone.is_some() {
            return by_phone;
        }

        let wanted = company.and_then(company_key)?;
        clients.iter().find(|client| {
            client
                .company
                .as_deref()
                .and_then(company_key)
                .is_some_and(|key| key == wanted)
        })
    }
}

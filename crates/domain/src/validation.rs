// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking::BookingDraft;
use crate::client::PhoneNumber;
use crate::error::DomainError;
use crate::money::Money;

/// Rejects empty or whitespace-only text.
///
/// # Errors
///
/// Returns `EmptyField` naming `field`.
pub fn validate_non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(())
}

/// Requires an amount greater than zero.
///
/// # Errors
///
/// Returns `NonPositiveAmount` naming `field`.
pub const fn validate_amount_positive(field: &'static str, amount: Money) -> Result<(), DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            field,
            kobo: amount.kobo(),
        });
    }
    Ok(())
}

/// Requires an amount of zero or more.
///
/// # Errors
///
/// Returns `NegativeAmount` naming `field`.
pub const fn validate_amount_non_negative(
    field: &'static str,
    amount: Money,
) -> Result<(), DomainError> {
    if amount.is_negative() {
        return Err(DomainError::NegativeAmount {
            field,
            kobo: amount.kobo(),
        });
    }
    Ok(())
}

/// Requires a quantity of at least one.
///
/// # Errors
///
/// Returns `InvalidQuantity` otherwise.
pub const fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Requires an absolute `http` or `https` URL with a host.
///
/// Documents and receipts are stored as links returned by the upload
/// worker; this only checks the shape.
///
/// # Errors
///
/// Returns `InvalidUrl` otherwise.
pub fn validate_url(raw: &str) -> Result<(), DomainError> {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .ok_or_else(|| DomainError::InvalidUrl(raw.to_string()))?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || raw.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidUrl(raw.to_string()));
    }
    Ok(())
}

/// Validates client contact details.
///
/// # Errors
///
/// Returns an error if the name is empty, the phone cannot be normalized,
/// or the email is present but has no `@`.
pub fn validate_client_fields(
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> Result<PhoneNumber, DomainError> {
    validate_non_empty("client_name", name)?;
    let phone = PhoneNumber::normalize(phone)?;
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty())
        && !email.contains('@')
    {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }
    Ok(phone)
}

/// Validates an intake form.
///
/// Uniqueness of the client is not checked here; that needs the existing
/// client list.
///
/// # Errors
///
/// Returns the first field error found.
pub fn validate_booking_fields(draft: &BookingDraft) -> Result<PhoneNumber, DomainError> {
    let phone = validate_client_fields(
        &draft.client_name,
        &draft.client_phone,
        draft.client_email.as_deref(),
    )?;
    validate_non_empty("pickup_address", &draft.pickup_address)?;
    validate_non_empty("dropoff_address", &draft.dropoff_address)?;
    validate_non_empty("cargo_description", &draft.cargo_description)?;
    validate_amount_non_negative("budget", draft.budget)?;
    Ok(phone)
}

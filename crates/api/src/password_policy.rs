// Copyright (C) 2026 The Fleetdesk Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules for operator accounts.

use thiserror::Error;

/// Why a password was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password and confirmation differ.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,

    /// Password is shorter than the minimum.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Too few character classes.
    #[error(
        "Password must mix at least {required} of: uppercase, lowercase, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password contains the operator's own name.
    #[error("Password must not contain the {field}")]
    ContainsIdentity { field: &'static str },
}

/// Password policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters.
    pub min_length: usize,
    /// Minimum number of character classes (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Checks a new password.
    ///
    /// The login and display names are compared case-insensitively; a
    /// password containing either one is refused.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found = character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered = password.to_lowercase();
        for (field, name) in [("login name", login_name), ("display name", display_name)] {
            let name = name.trim().to_lowercase();
            if !name.is_empty() && lowered.contains(&name) {
                return Err(PasswordPolicyError::ContainsIdentity { field });
            }
        }

        Ok(())
    }
}

/// Counts how many of uppercase, lowercase, digit and symbol appear.
fn character_classes(password: &str) -> usize {
    let checks: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c| !c.is_alphanumeric() && !c.is_whitespace(),
    ];
    checks
        .iter()
        .filter(|check| password.chars().any(|c| check(&c)))
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn check(password: &str) -> Result<(), PasswordPolicyError> {
        PasswordPolicy::default().validate(password, password, "dispatch1", "Ada Obi")
    }

    #[test]
    fn accepts_three_or_four_classes() {
        assert!(check("Lagos-Route-77").is_ok());
        assert!(check("truckfleet2026!").is_ok());
        assert!(check("KanoDepot2026").is_ok());
    }

    #[test]
    fn rejects_mismatched_confirmation() {
        let result = PasswordPolicy::default().validate(
            "Lagos-Route-77",
            "Lagos-Route-78",
            "dispatch1",
            "Ada Obi",
        );
        assert_eq!(result, Err(PasswordPolicyError::ConfirmationMismatch));
    }

    #[test]
    fn rejects_short_passwords() {
        assert_eq!(
            check("Ab1!ab1!"),
            Err(PasswordPolicyError::TooShort { min_length: 12 })
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Eleven characters, more than twelve bytes.
        assert_eq!(
            check("₦₦₦Abc123!x"),
            Err(PasswordPolicyError::TooShort { min_length: 12 })
        );
    }

    #[test]
    fn rejects_low_complexity() {
        assert_eq!(
            check("onlylowercaseletters"),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 1
            })
        );
        assert_eq!(
            check("UpperAndLowerOnly"),
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn rejects_passwords_containing_names() {
        assert_eq!(
            check("xxDISPATCH1xx!"),
            Err(PasswordPolicyError::ContainsIdentity {
                field: "login name"
            })
        );
        assert_eq!(
            check("my-ada obi-2026"),
            Err(PasswordPolicyError::ContainsIdentity {
                field: "display name"
            })
        );
    }

    #[test]
    fn counts_character_classes() {
        assert_eq!(character_classes("Aa1!"), 4);
        assert_eq!(character_classes("Aa1"), 3);
        assert_eq!(character_classes("abc-"), 2);
        assert_eq!(character_classes("abc"), 1);
        assert_eq!(character_classes(""), 0);
    }
}

use regex::Regex;

use crate::errors::{BankError, BankResult};

/// Input validation for every user-submitted form field.
///
/// All checks here run before any network call; a failure means the request
/// is never dispatched.
pub struct InputValidator {
    amount_pattern: Regex,
    email_pattern: Regex,
}

impl InputValidator {
    pub fn new() -> BankResult<Self> {
        let amount_pattern = Regex::new(r"^\d+(\.\d+)?$")
            .map_err(|e| BankError::Validation(format!("Invalid amount regex: {}", e)))?;

        let email_pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .map_err(|e| BankError::Validation(format!("Invalid email regex: {}", e)))?;

        Ok(InputValidator {
            amount_pattern,
            email_pattern,
        })
    }

    /// Validate and normalize an amount string.
    ///
    /// A decimal comma is accepted and rewritten to a decimal point before
    /// parsing. Returns the normalized string; the value must parse as a
    /// positive decimal.
    pub fn validate_amount(&self, amount: &str) -> BankResult<String> {
        let trimmed = amount.trim();
        if trimmed.is_empty() {
            return Err(BankError::Validation("Amount cannot be empty".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        if !self.amount_pattern.is_match(&normalized) {
            return Err(BankError::Validation(
                "Amount format is invalid".to_string(),
            ));
        }

        let parsed: f64 = normalized
            .parse()
            .map_err(|_| BankError::Validation("Amount format is invalid".to_string()))?;
        if parsed <= 0.0 {
            return Err(BankError::Validation(
                "Amount must be positive".to_string(),
            ));
        }

        Ok(normalized)
    }

    pub fn validate_email(&self, email: &str) -> BankResult<()> {
        if email.trim().is_empty() {
            return Err(BankError::Validation("Email cannot be empty".to_string()));
        }
        if !self.email_pattern.is_match(email.trim()) {
            return Err(BankError::Validation("Email format is invalid".to_string()));
        }
        Ok(())
    }

    /// Require a non-empty form field, naming it in the error.
    pub fn require(&self, field: &str, value: &str) -> BankResult<()> {
        if value.trim().is_empty() {
            return Err(BankError::Validation(format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    /// Check a new password against its confirmation. An empty new password
    /// means "keep the current one" and passes regardless of confirmation.
    pub fn validate_password_change(
        &self,
        new_password: &str,
        confirm_password: &str,
    ) -> BankResult<()> {
        if new_password.is_empty() {
            return Ok(());
        }
        if new_password != confirm_password {
            return Err(BankError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new().expect("Failed to create InputValidator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> InputValidator {
        InputValidator::default()
    }

    #[test]
    fn comma_amount_normalized_to_dot() {
        assert_eq!(validator().validate_amount("12,50").unwrap(), "12.50");
        assert_eq!(validator().validate_amount("0,01").unwrap(), "0.01");
    }

    #[test]
    fn dot_amount_passes_through() {
        assert_eq!(validator().validate_amount("100.25").unwrap(), "100.25");
        assert_eq!(validator().validate_amount("7").unwrap(), "7");
    }

    #[test]
    fn non_numeric_amount_rejected() {
        for input in ["", "   ", "abc", "10.5.1", "10,5,1", "-5", "1e3", "10 USD"] {
            assert!(
                matches!(validator().validate_amount(input), Err(BankError::Validation(_))),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn zero_amount_rejected() {
        assert!(matches!(
            validator().validate_amount("0"),
            Err(BankError::Validation(_))
        ));
        assert!(matches!(
            validator().validate_amount("0,00"),
            Err(BankError::Validation(_))
        ));
    }

    #[test]
    fn email_shape_checked() {
        assert!(validator().validate_email("ada@example.com").is_ok());
        assert!(validator().validate_email("not-an-email").is_err());
        assert!(validator().validate_email("").is_err());
    }

    #[test]
    fn password_change_requires_matching_confirmation() {
        let v = validator();
        assert!(v.validate_password_change("", "anything").is_ok());
        assert!(v.validate_password_change("secret1", "secret1").is_ok());
        assert!(matches!(
            v.validate_password_change("secret1", "secret2"),
            Err(BankError::Validation(_))
        ));
    }

    #[test]
    fn require_names_the_field() {
        let err = validator().require("First name", " ").unwrap_err();
        assert_eq!(
            err,
            BankError::Validation("First name cannot be empty".to_string())
        );
    }
}

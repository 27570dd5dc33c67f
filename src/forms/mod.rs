//! Client-side form schemas checked before any request is sent.

use std::borrow::Cow;

use chrono::NaiveDate;
use thiserror::Error;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::domain::types::{Amount, TypeConstraintError, normalize_phone_to_e164};

pub mod contact;
pub mod document;
pub mod playbook;
pub mod quote;
pub mod ticket;

#[derive(Debug, Error)]
/// Errors that can occur when turning form input into a request payload.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl FormError {
    pub(crate) fn field(field: &'static str) -> impl FnOnce(TypeConstraintError) -> FormError {
        move |err| FormError::InvalidField {
            field,
            reason: err.to_string(),
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Trimmed value of an optional text input, `None` when blank.
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "This field is required."));
    }
    Ok(())
}

pub(crate) fn optional_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() || trimmed.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Enter a valid email address."))
    }
}

pub(crate) fn optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || normalize_phone_to_e164(value).is_ok() {
        Ok(())
    } else {
        Err(invalid("phone", "Enter a valid phone number."))
    }
}

pub(crate) fn amount(value: &str) -> Result<(), ValidationError> {
    Amount::new(value)
        .map(|_| ())
        .map_err(|_| invalid("amount", "Enter a non-negative amount."))
}

pub(crate) fn optional_date(value: &str) -> Result<(), ValidationError> {
    match optional(value) {
        None => Ok(()),
        Some(date) => parse_date(&date)
            .map(|_| ())
            .map_err(|_| invalid("date", "Enter a date as YYYY-MM-DD.")),
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TypeConstraintError::InvalidValue(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_inputs_are_trimmed() {
        assert_eq!(optional("  x "), Some("x".to_string()));
        assert_eq!(optional("   "), None);
    }

    #[test]
    fn blank_optional_fields_pass() {
        assert!(optional_email("").is_ok());
        assert!(optional_phone(" ").is_ok());
        assert!(optional_date("").is_ok());
    }

    #[test]
    fn malformed_values_fail_with_messages() {
        let err = optional_email("nope").unwrap_err();
        assert_eq!(err.code, "email");
        assert!(err.message.is_some());
        assert!(optional_date("31/12/2024").is_err());
        assert!(amount("-5").is_err());
        assert!(not_blank("  ").is_err());
    }
}

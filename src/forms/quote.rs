use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::quote::{NewQuote, QuoteStatus};
use crate::domain::types::{Amount, ContactId, QuoteTitle};
use crate::forms::{FormError, amount, not_blank, optional, optional_date, parse_date};

fn contact_id(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<ContactId>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("contact"))
}

#[derive(Debug, Default, Deserialize, Validate)]
/// New quote page form. Quotes are always created as drafts.
pub struct QuoteForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "contact_id"))]
    pub contact: String,
    #[validate(custom(function = "amount"))]
    pub total: String,
    #[serde(default)]
    #[validate(custom(function = "optional_date"))]
    pub valid_until: String,
}

impl TryFrom<QuoteForm> for NewQuote {
    type Error = FormError;

    fn try_from(form: QuoteForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(NewQuote {
            title: QuoteTitle::new(form.title).map_err(FormError::field("title"))?,
            contact: form
                .contact
                .parse::<ContactId>()
                .map_err(FormError::field("contact"))?,
            status: QuoteStatus::Draft,
            total: Amount::new(form.total).map_err(FormError::field("total"))?,
            valid_until: optional(&form.valid_until)
                .map(|date| parse_date(&date))
                .transpose()
                .map_err(FormError::field("valid_until"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn builds_draft_quote() {
        let form = QuoteForm {
            title: "Annual support".to_string(),
            contact: "12".to_string(),
            total: "1250.00".to_string(),
            valid_until: "2026-12-31".to_string(),
        };

        let quote = NewQuote::try_from(form).unwrap();

        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.valid_until, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(
            serde_json::to_value(&quote).unwrap(),
            json!({
                "title": "Annual support",
                "contact": 12,
                "status": "draft",
                "total": "1250.00",
                "valid_until": "2026-12-31"
            })
        );
    }

    #[test]
    fn rejects_missing_contact_and_bad_amount() {
        let form = QuoteForm {
            title: "Support".to_string(),
            contact: "".to_string(),
            total: "12,50".to_string(),
            valid_until: String::new(),
        };

        let Err(FormError::Validation(errors)) = NewQuote::try_from(form) else {
            panic!("expected validation errors");
        };
        assert!(errors.field_errors().contains_key("contact"));
        assert!(errors.field_errors().contains_key("total"));
        assert!(!errors.field_errors().contains_key("valid_until"));
    }
}

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde_json::Value;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;

/// Field-level validation messages, either produced locally by a form schema
/// or parsed from a 4xx response body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    /// HTTP status when the errors came from the backend.
    pub status: Option<u16>,
    /// Form-wide message (`detail` or `non_field_errors`).
    pub detail: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn detail(message: impl Into<String>) -> Self {
        Self {
            detail: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields
            .entry(name.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Messages attached to one field, empty when the field is valid.
    pub fn messages(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parses a DRF error body.
    ///
    /// Accepts `{"detail": ".."}`, `{"field": ["..", ..]}`,
    /// `{"non_field_errors": [..]}` and falls back to the raw text.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let mut errors = FieldErrors {
            status: Some(status),
            ..FieldErrors::default()
        };

        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            let text = body.trim();
            if !text.is_empty() {
                errors.detail = Some(text.to_string());
            }
            return errors;
        };

        for (key, value) in map {
            let messages = flatten_messages(&value);
            match key.as_str() {
                "detail" | "non_field_errors" => {
                    let joined = messages.join(" ");
                    errors.detail = Some(match errors.detail.take() {
                        Some(existing) => format!("{existing} {joined}"),
                        None => joined,
                    });
                }
                _ => {
                    errors.fields.insert(key, messages);
                }
            }
        }

        errors
    }
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(detail) = &self.detail {
            parts.push(detail.clone());
        }
        for (field, messages) in &self.fields {
            parts.push(format!("{field}: {}", messages.join(", ")));
        }
        if parts.is_empty() {
            parts.push("invalid input".to_string());
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut result = FieldErrors::default();
        for (field, kind) in errors.errors() {
            if let ValidationErrorsKind::Field(field_errors) = kind {
                let messages = field_errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(message) => message.to_string(),
                        None => err.code.to_string(),
                    })
                    .collect();
                result.fields.insert(field.to_string(), messages);
            }
        }
        result
    }
}

/// Failures surfaced by resource clients and the list controller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// 4xx response or a form rejected before any request was made.
    #[error("validation error: {0}")]
    Validation(FieldErrors),

    /// 5xx response.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A successful response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Maps a non-2xx status and its body onto the error taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self {
        if (400..500).contains(&status) {
            ClientError::Validation(FieldErrors::from_response_body(status, body))
        } else {
            let message = body.trim();
            ClientError::Server {
                status,
                message: if message.is_empty() {
                    "no response body".to_string()
                } else {
                    message.chars().take(512).collect()
                },
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), "")
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation(errors.into())
    }
}

impl From<TypeConstraintError> for ClientError {
    fn from(err: TypeConstraintError) -> Self {
        ClientError::Validation(FieldErrors::detail(err.to_string()))
    }
}

impl From<FormError> for ClientError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => errors.into(),
            FormError::InvalidField { field, reason } => {
                ClientError::Validation(FieldErrors::default().field(field, reason))
            }
        }
    }
}

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Body of `POST /api/contact`. Every field is optional here so a missing
/// field is reported as a validation error, not a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub recipient_key: Option<String>,
}

/// A request that passed validation, with its recipient resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub recipient: String,
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Unknown recipient")]
    UnknownRecipient,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Failed to send email")]
    Send(String),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::MissingField(_)
            | ContactError::UnknownRecipient
            | ContactError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ContactError::Send(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ContactError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ContactError::MissingField(field)),
    }
}

impl ContactRequest {
    /// Check required fields, then resolve `recipientKey` to an address.
    pub fn validate(
        &self,
        recipients: &HashMap<String, String>,
    ) -> Result<ValidContact, ContactError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let message = required(&self.message, "message")?;
        let key = required(&self.recipient_key, "recipientKey")?;

        let recipient = recipients
            .get(&key)
            .cloned()
            .ok_or(ContactError::UnknownRecipient)?;

        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(ValidContact {
            name,
            email,
            subject,
            message,
            recipient,
        })
    }
}

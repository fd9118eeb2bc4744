use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    RateLimitExceeded { retry_after_secs: u64 },
    VerificationFailed,
    ValidationError(Vec<FieldError>),
    DatabaseError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RateLimitExceeded { retry_after_secs } => {
                write!(f, "Rate limit exceeded, retry in {}s", retry_after_secs)
            }
            AppError::VerificationFailed => write!(f, "Captcha verification failed"),
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::RateLimitExceeded { .. } => serde_json::json!({
                "success": false,
                "message": "Too many requests. Please try again in a minute."
            }),
            AppError::VerificationFailed => serde_json::json!({
                "success": false,
                "message": "Captcha verification failed. Please try again."
            }),
            AppError::ValidationError(errors) => serde_json::json!({
                "success": false,
                "message": "Please correct the highlighted fields and try again.",
                "errors": field_error_map(errors)
            }),
            _ => serde_json::json!({
                "success": false,
                "message": "Something went wrong on our end. Please try again later."
            }),
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::RateLimitExceeded { retry_after_secs } = self {
            builder.insert_header(("Retry-After", retry_after_secs.to_string()));
        }
        builder.insert_header(ContentType::json()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::VerificationFailed => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One message per payload field, keyed by the field's wire (camelCase) name.
fn field_error_map(errors: &[FieldError]) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    for e in errors {
        map.entry(e.field.clone())
            .or_insert_with(|| serde_json::Value::String(e.message.clone()));
    }
    map
}

/// Flattens validator output into per-field errors, renaming the Rust field
/// idents to the payload's camelCase names.
pub fn field_errors_from(errors: ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(|e| FieldError {
                field: to_camel_case(field),
                message: e
                    .message
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect()
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(field_errors_from(errors))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

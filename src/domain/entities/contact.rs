use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::phone;
use crate::errors::{field_errors_from, AppError, FieldError};
use crate::utils::sanitize::{clean_text, non_empty, normalize_email};

/// Raw contact form payload. Every field is defaulted so a missing field
/// surfaces as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    /// Validated against the selected country's digit rules in
    /// [`ContactForm::validate_full`], not via a derive attribute.
    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 6, message = "Select a country code"))]
    pub country_code: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Company must be at most 200 characters"))]
    pub company: String,

    #[serde(default)]
    #[validate(length(min = 3, max = 150, message = "Subject must be between 3 and 150 characters"))]
    pub subject: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Service interest must be at most 100 characters"))]
    pub service_interest: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "Budget range must be at most 50 characters"))]
    pub budget_range: String,

    #[serde(default)]
    #[validate(length(min = 10, max = 2000, message = "Message must be between 10 and 2000 characters"))]
    pub message: String,

    #[serde(default)]
    pub captcha_token: String,
}

impl ContactForm {
    /// Runs the derived schema rules plus the per-country phone check,
    /// producing one combined per-field error set.
    pub fn validate_full(&self) -> Result<(), AppError> {
        let mut errors: Vec<FieldError> = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors_from(e),
        };

        if let Err(message) = phone::validate(&self.phone, &self.country_code) {
            errors.push(FieldError {
                field: "phone".to_string(),
                message,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(errors))
        }
    }

    /// Sanitizes the validated form into its insertable shape: trimmed and
    /// HTML-stripped text, lowercased email, digits-only phone, empty
    /// optionals collapsed to None.
    pub fn prepare_for_insert(&self, meta: SubmissionMeta) -> ContactInsert {
        ContactInsert {
            name: clean_text(&self.name),
            email: normalize_email(&self.email),
            phone: phone::normalize(&self.phone),
            country_code: self.country_code.trim().to_string(),
            company: non_empty(&self.company).map(|c| clean_text(&c)),
            subject: clean_text(&self.subject),
            service_interest: non_empty(&self.service_interest),
            budget_range: non_empty(&self.budget_range),
            message: clean_text(&self.message),
            captcha_score: meta.captcha_score,
            client_ip: meta.client_ip,
            user_agent: meta.user_agent,
            created_at: Utc::now(),
        }
    }
}

/// Request context recorded alongside the sanitized fields.
#[derive(Debug, Clone, Default)]
pub struct SubmissionMeta {
    pub captcha_score: Option<f64>,
    pub client_ip: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactInsert {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub company: Option<String>,
    pub subject: String,
    pub service_interest: Option<String>,
    pub budget_range: Option<String>,
    pub message: String,
    pub captcha_score: Option<f64>,
    pub client_ip: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persisted contact submission. Insert-only, never mutated.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub company: Option<String>,
    pub subject: String,
    pub service_interest: Option<String>,
    pub budget_range: Option<String>,
    pub message: String,
    pub captcha_score: Option<f64>,
    pub client_ip: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn from_insert(id: Uuid, insert: &ContactInsert) -> Self {
        ContactRecord {
            id,
            name: insert.name.clone(),
            email: insert.email.clone(),
            phone: insert.phone.clone(),
            country_code: insert.country_code.clone(),
            company: insert.company.clone(),
            subject: insert.subject.clone(),
            service_interest: insert.service_interest.clone(),
            budget_range: insert.budget_range.clone(),
            message: insert.message.clone(),
            captcha_score: insert.captcha_score,
            client_ip: insert.client_ip.clone(),
            user_agent: insert.user_agent.clone(),
            created_at: insert.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub contact_id: Uuid,
}

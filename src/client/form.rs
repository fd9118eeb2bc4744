use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::CAPTCHA_UNAVAILABLE_TOKEN;
use crate::domain::phone;
use crate::entities::contact::ContactForm;

/// Quick shape check for immediate feedback; the server runs the
/// authoritative validation.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    CountryCode,
    Company,
    Subject,
    ServiceInterest,
    BudgetRange,
    Message,
}

impl FormField {
    /// Wire name, matching the server's error-map keys.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::CountryCode => "countryCode",
            FormField::Company => "company",
            FormField::Subject => "subject",
            FormField::ServiceInterest => "serviceInterest",
            FormField::BudgetRange => "budgetRange",
            FormField::Message => "message",
        }
    }

    const ALL: [FormField; 9] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::CountryCode,
        FormField::Company,
        FormField::Subject,
        FormField::ServiceInterest,
        FormField::BudgetRange,
        FormField::Message,
    ];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub company: String,
    pub subject: String,
    pub service_interest: String,
    pub budget_range: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Success { message: String },
    Error { message: String },
}

/// Local state machine for the contact form:
/// idle → submitting → success | error, returning to idle on the next edit.
#[derive(Debug, Clone)]
pub struct ContactFormModel {
    fields: FormFields,
    state: FormState,
    errors: HashMap<&'static str, String>,
}

impl Default for ContactFormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactFormModel {
    pub fn new() -> Self {
        ContactFormModel {
            fields: FormFields::default(),
            state: FormState::Idle,
            errors: HashMap::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.get(field.key()).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Updates one field, re-validating it immediately. Any edit after a
    /// terminal state returns the form to idle. Changing the country
    /// re-validates the phone number against the new digit rules.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        if matches!(self.state, FormState::Success { .. } | FormState::Error { .. }) {
            self.state = FormState::Idle;
        }

        let slot = match field {
            FormField::Name => &mut self.fields.name,
            FormField::Email => &mut self.fields.email,
            FormField::Phone => &mut self.fields.phone,
            FormField::CountryCode => &mut self.fields.country_code,
            FormField::Company => &mut self.fields.company,
            FormField::Subject => &mut self.fields.subject,
            FormField::ServiceInterest => &mut self.fields.service_interest,
            FormField::BudgetRange => &mut self.fields.budget_range,
            FormField::Message => &mut self.fields.message,
        };
        *slot = value.to_string();

        self.validate_field(field);
        if field == FormField::CountryCode && !self.fields.phone.trim().is_empty() {
            self.validate_field(FormField::Phone);
        }
    }

    fn validate_field(&mut self, field: FormField) {
        let error = match field {
            FormField::Name => {
                let len = self.fields.name.trim().chars().count();
                (len < 2).then(|| "Name must be at least 2 characters".to_string())
            }
            FormField::Email => {
                let email = self.fields.email.trim();
                (!EMAIL_PATTERN.is_match(email))
                    .then(|| "Enter a valid email address".to_string())
            }
            FormField::Phone => {
                phone::validate(&self.fields.phone, &self.fields.country_code).err()
            }
            FormField::CountryCode => self
                .fields
                .country_code
                .trim()
                .is_empty()
                .then(|| "Select a country code".to_string()),
            FormField::Subject => {
                let len = self.fields.subject.trim().chars().count();
                (len < 3).then(|| "Subject must be at least 3 characters".to_string())
            }
            FormField::Message => {
                let len = self.fields.message.trim().chars().count();
                (len < 10).then(|| "Message must be at least 10 characters".to_string())
            }
            // Optional fields never block submission.
            FormField::Company | FormField::ServiceInterest | FormField::BudgetRange => None,
        };

        match error {
            Some(message) => {
                self.errors.insert(field.key(), message);
            }
            None => {
                self.errors.remove(field.key());
            }
        }
    }

    /// Full validation pass over every field.
    pub fn validate_all(&mut self) -> bool {
        for field in FormField::ALL {
            self.validate_field(field);
        }
        self.errors.is_empty()
    }

    /// Full validation, then transition to submitting and build the payload.
    /// A missing captcha token is replaced by the sentinel value; submission
    /// is never blocked on the widget.
    pub fn begin_submit(&mut self, captcha_token: Option<String>) -> Option<ContactForm> {
        if !self.validate_all() {
            return None;
        }

        self.state = FormState::Submitting;
        Some(ContactForm {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            phone: self.fields.phone.clone(),
            country_code: self.fields.country_code.clone(),
            company: self.fields.company.clone(),
            subject: self.fields.subject.clone(),
            service_interest: self.fields.service_interest.clone(),
            budget_range: self.fields.budget_range.clone(),
            message: self.fields.message.clone(),
            captcha_token: captcha_token
                .unwrap_or_else(|| CAPTCHA_UNAVAILABLE_TOKEN.to_string()),
        })
    }

    /// Server accepted the submission: clear the form and show confirmation.
    pub fn complete_success(&mut self, message: String) {
        self.fields = FormFields::default();
        self.errors.clear();
        self.state = FormState::Success { message };
    }

    /// Server rejected the submission (or the request failed). Field errors,
    /// when present, are keyed by wire name and shown next to their inputs.
    pub fn complete_error(&mut self, message: String, field_errors: Option<HashMap<String, String>>) {
        if let Some(map) = field_errors {
            for field in FormField::ALL {
                if let Some(msg) = map.get(field.key()) {
                    self.errors.insert(field.key(), msg.clone());
                }
            }
        }
        self.state = FormState::Error { message };
    }
}

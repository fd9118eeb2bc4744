use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::form::{ContactFormModel, FormState};

/// Source of bot-verification tokens. A browser embedding loads the captcha
/// script and executes it; headless or degraded clients return None and the
/// sentinel value is submitted instead.
#[async_trait]
pub trait CaptchaTokenProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// Provider for clients where no captcha widget exists.
pub struct UnavailableCaptcha;

#[async_trait]
impl CaptchaTokenProvider for UnavailableCaptcha {
    async fn token(&self) -> Option<String> {
        None
    }
}

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Deserialize)]
struct ServerReply {
    success: bool,
    message: Option<String>,
    errors: Option<HashMap<String, String>>,
    #[serde(rename = "contactId")]
    contact_id: Option<Uuid>,
}

/// Submits a [`ContactFormModel`] to the contact endpoint and folds the
/// server's reply back into the model's state.
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ContactClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn submit(
        &self,
        model: &mut ContactFormModel,
        tokens: &dyn CaptchaTokenProvider,
    ) -> FormState {
        let Some(payload) = model.begin_submit(tokens.token().await) else {
            // Local validation failed; stay idle with field errors set.
            return model.state().clone();
        };

        match self.http.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => match response.json::<ServerReply>().await {
                Ok(reply) if reply.success => {
                    tracing::debug!(contact_id = ?reply.contact_id, "Contact submission accepted");
                    model.complete_success(
                        reply
                            .message
                            .unwrap_or_else(|| "Your message has been received.".to_string()),
                    );
                }
                Ok(reply) => {
                    model.complete_error(
                        reply.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                        reply.errors,
                    );
                }
                Err(e) => {
                    tracing::warn!("Contact submission returned an unreadable body: {}", e);
                    model.complete_error(GENERIC_FAILURE.to_string(), None);
                }
            },
            Err(e) => {
                tracing::warn!("Contact submission failed to send: {}", e);
                model.complete_error(GENERIC_FAILURE.to_string(), None);
            }
        }

        model.state().clone()
    }
}

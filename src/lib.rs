use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, phone, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{captcha, db, email, limiter, utils};

use captcha::recaptcha::CaptchaVerifier;
use constants::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW};
use email::mailer::Mailer;
use limiter::rate_limiter::FixedWindowLimiter;
use repositories::{contact::ContactRepository, sqlx_repo::SqlxContactRepo};
use use_cases::contact::ContactHandler;

pub type AppContactHandler = ContactHandler<Arc<dyn ContactRepository>>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub rate_limiter: FixedWindowLimiter,
    pub captcha: CaptchaVerifier,
    pub mailer: Option<Arc<Mailer>>,
    pub trust_proxy_headers: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let contact_repo: Arc<dyn ContactRepository> = Arc::new(SqlxContactRepo::new(pool));
        let contact_handler = ContactHandler::new(contact_repo);

        let mailer = match Mailer::from_config(config) {
            Ok(Some(mailer)) => Some(Arc::new(mailer)),
            Ok(None) => {
                tracing::warn!("SMTP not configured; contact emails are disabled");
                None
            }
            Err(e) => {
                tracing::error!("Mailer initialisation failed: {}", e);
                None
            }
        };

        if !config.captcha_enabled() {
            tracing::warn!("Captcha secret not configured; token verification is disabled");
        }

        AppState {
            contact_handler,
            rate_limiter: FixedWindowLimiter::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW),
            captcha: CaptchaVerifier::new(config.recaptcha_secret.clone()),
            mailer,
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }
}

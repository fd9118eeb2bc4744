use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Fixed-window limit applied per client IP on the contact endpoint.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 3;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Token the browser substitutes when the captcha script never loaded.
pub const CAPTCHA_UNAVAILABLE_TOKEN: &str = "no-captcha-available";

/// Token the browser substitutes when the captcha widget errored mid-execute.
pub const CAPTCHA_ERROR_TOKEN: &str = "captcha-error";

/// Minimum risk score accepted from the verification service.
pub const CAPTCHA_SCORE_THRESHOLD: f64 = 0.5;

pub const CAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// True for tokens that mean the widget was unavailable on the client.
/// Sentinel tokens skip verification.
pub fn is_captcha_sentinel(token: &str) -> bool {
    token == CAPTCHA_UNAVAILABLE_TOKEN || token == CAPTCHA_ERROR_TOKEN
}

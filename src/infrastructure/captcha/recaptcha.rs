use serde::Deserialize;

use crate::constants::{is_captcha_sentinel, CAPTCHA_SCORE_THRESHOLD, CAPTCHA_VERIFY_URL};

/// Raw response from the verification service.
#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    score: Option<f64>,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerificationOutcome {
    pub passed: bool,
    pub score: Option<f64>,
}

impl VerificationOutcome {
    fn passed_without_score() -> Self {
        VerificationOutcome { passed: true, score: None }
    }
}

/// Token verification against the reCAPTCHA siteverify endpoint.
///
/// Fails open: an unconfigured secret, a sentinel token, or any
/// transport/parse failure all count as a pass.
#[derive(Clone)]
pub struct CaptchaVerifier {
    secret: Option<String>,
    verify_url: String,
    http: reqwest::Client,
}

impl CaptchaVerifier {
    pub fn new(secret: Option<String>) -> Self {
        CaptchaVerifier {
            secret: secret.filter(|s| !s.trim().is_empty()),
            verify_url: CAPTCHA_VERIFY_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub async fn verify(&self, token: &str, client_ip: &str) -> VerificationOutcome {
        if is_captcha_sentinel(token) {
            tracing::debug!("Captcha token unavailable on client; skipping verification");
            return VerificationOutcome::passed_without_score();
        }

        let Some(secret) = &self.secret else {
            return VerificationOutcome::passed_without_score();
        };

        match self.siteverify(secret, token, client_ip).await {
            Ok(response) => {
                let outcome = Self::evaluate(&response);
                if !outcome.passed {
                    tracing::warn!(
                        score = ?response.score,
                        error_codes = ?response.error_codes,
                        "Captcha verification rejected submission"
                    );
                }
                outcome
            }
            Err(e) => {
                tracing::warn!("Captcha verification unreachable, allowing submission: {}", e);
                VerificationOutcome::passed_without_score()
            }
        }
    }

    async fn siteverify(
        &self,
        secret: &str,
        token: &str,
        client_ip: &str,
    ) -> Result<SiteverifyResponse, reqwest::Error> {
        self.http
            .post(&self.verify_url)
            .form(&[
                ("secret", secret),
                ("response", token),
                ("remoteip", client_ip),
            ])
            .send()
            .await?
            .json::<SiteverifyResponse>()
            .await
    }

    /// Accept iff the service succeeded and, when a risk score is present,
    /// the score clears the threshold.
    fn evaluate(response: &SiteverifyResponse) -> VerificationOutcome {
        let passed = response.success
            && response
                .score
                .is_none_or(|score| score >= CAPTCHA_SCORE_THRESHOLD);
        VerificationOutcome {
            passed,
            score: response.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CAPTCHA_ERROR_TOKEN, CAPTCHA_UNAVAILABLE_TOKEN};

    fn response(success: bool, score: Option<f64>) -> SiteverifyResponse {
        SiteverifyResponse {
            success,
            score,
            error_codes: Vec::new(),
        }
    }

    #[test]
    fn score_below_threshold_is_rejected() {
        let outcome = CaptchaVerifier::evaluate(&response(true, Some(0.4)));
        assert!(!outcome.passed);
        assert_eq!(outcome.score, Some(0.4));
    }

    #[test]
    fn score_at_or_above_threshold_is_accepted() {
        assert!(CaptchaVerifier::evaluate(&response(true, Some(0.5))).passed);
        assert!(CaptchaVerifier::evaluate(&response(true, Some(0.6))).passed);
    }

    #[test]
    fn unsuccessful_response_is_rejected_regardless_of_score() {
        assert!(!CaptchaVerifier::evaluate(&response(false, Some(0.9))).passed);
        assert!(!CaptchaVerifier::evaluate(&response(false, None)).passed);
    }

    #[test]
    fn scoreless_success_is_accepted() {
        assert!(CaptchaVerifier::evaluate(&response(true, None)).passed);
    }

    #[tokio::test]
    async fn sentinel_tokens_bypass_verification() {
        let verifier = CaptchaVerifier::new(Some("secret".into()));
        assert!(verifier.verify(CAPTCHA_UNAVAILABLE_TOKEN, "127.0.0.1").await.passed);
        assert!(verifier.verify(CAPTCHA_ERROR_TOKEN, "127.0.0.1").await.passed);
    }

    #[tokio::test]
    async fn missing_secret_skips_verification() {
        let verifier = CaptchaVerifier::new(None);
        assert!(!verifier.is_enabled());
        assert!(verifier.verify("any-token", "127.0.0.1").await.passed);
    }

    #[tokio::test]
    async fn blank_secret_counts_as_unconfigured() {
        let verifier = CaptchaVerifier::new(Some("   ".into()));
        assert!(!verifier.is_enabled());
        assert!(verifier.verify("any-token", "127.0.0.1").await.passed);
    }
}

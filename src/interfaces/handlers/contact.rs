use actix_web::{http::header, web, HttpRequest, HttpResponse};

use crate::{
    entities::contact::{ContactForm, ContactResponse, SubmissionMeta},
    errors::AppError,
    limiter::rate_limiter::RateLimitDecision,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Submission pipeline: rate limit → captcha → validate/sanitize → persist →
/// fire-and-forget emails → 201.
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, AppError> {
    let client_ip = get_client_ip(&req, state.trust_proxy_headers);

    if let RateLimitDecision::Denied { retry_after_secs } = state.rate_limiter.check(&client_ip) {
        tracing::warn!(%client_ip, "Contact submission rate limited");
        return Err(AppError::RateLimitExceeded { retry_after_secs });
    }

    let form = form.into_inner();

    let verification = state.captcha.verify(&form.captcha_token, &client_ip).await;
    if !verification.passed {
        return Err(AppError::VerificationFailed);
    }

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(str::to_string);

    let meta = SubmissionMeta {
        captcha_score: verification.score,
        client_ip,
        user_agent,
    };

    let record = state.contact_handler.create_contact(form, meta).await?;

    // Emails go out after the record is durably stored; the response never
    // waits on the SMTP round-trip.
    if let Some(mailer) = state.mailer.clone() {
        let record = record.clone();
        tokio::spawn(async move {
            mailer.send_contact_emails(&record).await;
        });
    } else {
        tracing::debug!(contact_id = %record.id, "SMTP not configured; skipping contact emails");
    }

    Ok(HttpResponse::Created().json(ContactResponse {
        success: true,
        message: "Your message has been received. We'll be in touch soon.".to_string(),
        contact_id: record.id,
    }))
}

/// Everything except POST on the contact resource.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "success": false,
        "message": "Method not allowed. Use POST."
    }))
}

mod test_utils;

use contact_backend::{
    client::{
        form::{ContactFormModel, FormField, FormFields, FormState},
        submit::{CaptchaTokenProvider, ContactClient, UnavailableCaptcha},
    },
    errors::AppError,
    repositories::contact::MockContactRepository,
};
use async_trait::async_trait;
use test_utils::*;

struct StaticToken(&'static str);

#[async_trait]
impl CaptchaTokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

fn filled_model() -> ContactFormModel {
    let mut model = ContactFormModel::new();
    model.set_field(FormField::Name, "Jane Doe");
    model.set_field(FormField::Email, "jane@example.com");
    model.set_field(FormField::CountryCode, "+1");
    model.set_field(FormField::Phone, "403-555-1234");
    model.set_field(FormField::Subject, "Project enquiry");
    model.set_field(FormField::Message, "We would like a quote for a new site.");
    model
}

#[actix_rt::test]
async fn successful_submission_resets_the_form() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(app.contact_url());

    let mut model = filled_model();
    let state = client.submit(&mut model, &StaticToken("tok")).await;

    assert!(matches!(state, FormState::Success { .. }));
    assert_eq!(*model.fields(), FormFields::default());
}

#[actix_rt::test]
async fn unavailable_captcha_still_submits_with_the_sentinel() {
    // No captcha secret on the server side either, so the sentinel passes
    // straight through.
    let app = TestApp::spawn().await;
    let client = ContactClient::new(app.contact_url());

    let mut model = filled_model();
    let state = client.submit(&mut model, &UnavailableCaptcha).await;

    assert!(matches!(state, FormState::Success { .. }));
}

#[actix_rt::test]
async fn invalid_fields_block_submission_locally() {
    let app = TestApp::spawn().await;
    let client = ContactClient::new(app.contact_url());

    let mut model = ContactFormModel::new();
    model.set_field(FormField::Email, "not-an-email");

    let state = client.submit(&mut model, &UnavailableCaptcha).await;

    // Never left idle: the request was not sent.
    assert_eq!(state, FormState::Idle);
    assert!(model.error_for(FormField::Name).is_some());
    assert!(model.error_for(FormField::Email).is_some());
}

#[actix_rt::test]
async fn server_failure_shows_a_generic_retry_message() {
    let mut repo = MockContactRepository::new();
    repo.expect_insert_contact()
        .returning(|_| Err(AppError::DatabaseError("down".into())));
    let app = TestApp::spawn_with_repo(repo).await;
    let client = ContactClient::new(app.contact_url());

    let mut model = filled_model();
    let state = client.submit(&mut model, &UnavailableCaptcha).await;

    let FormState::Error { message } = state else {
        panic!("expected error state");
    };
    assert!(message.contains("try again"));
}

#[actix_rt::test]
async fn unreachable_server_shows_a_generic_retry_message() {
    let client = ContactClient::new("http://127.0.0.1:9/api/contact");

    let mut model = filled_model();
    let state = client.submit(&mut model, &UnavailableCaptcha).await;

    assert!(matches!(state, FormState::Error { .. }));
}

#[actix_rt::test]
async fn rate_limited_submission_surfaces_the_server_message() {
    let app = TestApp::spawn().await;

    // Exhaust the window from the shared peer address first.
    for _ in 0..3 {
        app.client
            .post(app.contact_url())
            .json(&valid_payload())
            .send()
            .await
            .unwrap();
    }

    let client = ContactClient::new(app.contact_url());
    let mut model = filled_model();
    let state = client.submit(&mut model, &UnavailableCaptcha).await;

    let FormState::Error { message } = state else {
        panic!("expected error state");
    };
    assert!(message.contains("Too many requests"));
}

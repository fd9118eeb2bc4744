use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use contact_backend::{
    captcha::recaptcha::CaptchaVerifier,
    constants::{RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW},
    entities::contact::ContactRecord,
    limiter::rate_limiter::FixedWindowLimiter,
    repositories::contact::{ContactRepository, MockContactRepository},
    routes::configure_routes,
    use_cases::contact::ContactHandler,
    AppState,
};
use reqwest::Client;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub client: Client,
}

impl TestApp {
    /// Spawns the app with a permissive mock repository: inserts echo the
    /// sanitized record back and connection checks succeed.
    pub async fn spawn() -> Self {
        let mut repo = MockContactRepository::new();
        repo.expect_insert_contact()
            .returning(|insert| Ok(ContactRecord::from_insert(Uuid::new_v4(), insert)));
        repo.expect_check_connection().returning(|| Ok(()));

        Self::spawn_with_repo(repo).await
    }

    /// Spawns the app on a random port with the given repository mock.
    /// Captcha secret and SMTP are left unconfigured. X-Forwarded-For is
    /// trusted so each test can pick its client IP per request.
    pub async fn spawn_with_repo(repo: MockContactRepository) -> Self {
        let state = Arc::new(AppState {
            contact_handler: ContactHandler::new(Arc::new(repo) as Arc<dyn ContactRepository>),
            rate_limiter: FixedWindowLimiter::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW),
            captcha: CaptchaVerifier::new(None),
            mailer: None,
            trust_proxy_headers: true,
        });

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, client }
    }

    pub fn contact_url(&self) -> String {
        format!("{}/api/contact", self.address)
    }

    /// POSTs a payload from the given client IP.
    pub async fn submit_from(&self, ip: &str, payload: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.contact_url())
            .header("x-forwarded-for", ip)
            .json(payload)
            .send()
            .await
            .expect("Failed to send contact submission")
    }
}

pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "403-555-1234",
        "countryCode": "+1",
        "company": "Acme Ltd",
        "subject": "Project enquiry",
        "serviceInterest": "Web development",
        "budgetRange": "$5k-$10k",
        "message": "We would like a quote for a new marketing site.",
        "captchaToken": "no-captcha-available"
    })
}

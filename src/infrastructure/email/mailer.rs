use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::entities::contact::ContactRecord;
use crate::settings::AppConfig;

/// SMTP delivery for the two per-submission emails: the owner notification
/// and the submitter acknowledgement. Both are best-effort; the caller never
/// waits on them.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    notify_email: String,
    site_name: String,
}

impl Mailer {
    /// Builds the mailer, or None when no SMTP host is configured.
    ///
    /// `smtp_encryption` controls the transport mode:
    /// - `"starttls"` (default): opportunistic STARTTLS, typically port 587
    /// - `"tls"`: implicit TLS (SMTPS), typically port 465
    /// - `"none"`: unencrypted, local dev only
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(None);
        };

        let mut builder = match config.smtp_encryption.as_str() {
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .context("failed to create SMTP relay transport")?
                .port(config.smtp_port),
            "none" => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(config.smtp_port)
            }
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .context("failed to create SMTP STARTTLS transport")?
                .port(config.smtp_port),
        };

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Some(Mailer {
            transport: builder.build(),
            from_email: config.contact_from_email.clone(),
            notify_email: config.contact_notify_email.clone(),
            site_name: config.site_name.clone(),
        }))
    }

    /// Sends both submission emails concurrently. Failures are logged per
    /// message and never propagated.
    pub async fn send_contact_emails(&self, record: &ContactRecord) {
        let (notify, acknowledge) = futures::future::join(
            self.notify_owner(record),
            self.acknowledge_submitter(record),
        )
        .await;

        if let Err(e) = notify {
            tracing::error!(contact_id = %record.id, "Owner notification failed: {:#}", e);
        }
        if let Err(e) = acknowledge {
            tracing::error!(contact_id = %record.id, "Submitter acknowledgement failed: {:#}", e);
        }
    }

    async fn notify_owner(&self, record: &ContactRecord) -> Result<()> {
        let subject = format!("New contact form submission: {}", record.subject);
        let body = format!(
            "A new enquiry arrived via the contact form.\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Phone: {dial} {phone}\n\
             Company: {company}\n\
             Service interest: {service}\n\
             Budget range: {budget}\n\n\
             Message:\n{message}\n\n\
             Reference: {id}\n",
            name = record.name,
            email = record.email,
            dial = record.country_code,
            phone = record.phone,
            company = record.company.as_deref().unwrap_or("-"),
            service = record.service_interest.as_deref().unwrap_or("-"),
            budget = record.budget_range.as_deref().unwrap_or("-"),
            message = record.message,
            id = record.id,
        );

        self.send(&self.notify_email, &subject, &body).await
    }

    async fn acknowledge_submitter(&self, record: &ContactRecord) -> Result<()> {
        let subject = format!("We received your message at {}", self.site_name);
        let body = format!(
            "Hi {name},\n\n\
             Thanks for reaching out to {site}. Your message has been received\n\
             and we will get back to you shortly.\n\n\
             Your reference: {id}\n",
            name = record.name,
            site = self.site_name,
            id = record.id,
        );

        self.send(&record.email, &subject, &body).await
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .context("invalid from email address")?,
            )
            .to(to.parse().context("invalid recipient email address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("failed to send email")?;

        Ok(())
    }
}

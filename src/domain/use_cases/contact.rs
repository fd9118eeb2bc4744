use crate::{
    entities::contact::{ContactForm, ContactRecord, SubmissionMeta},
    errors::AppError,
    repositories::contact::ContactRepository,
};

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R) -> Self {
        ContactHandler { contact_repo }
    }

    /// Validates, sanitizes, and persists a submission.
    pub async fn create_contact(
        &self,
        form: ContactForm,
        meta: SubmissionMeta,
    ) -> Result<ContactRecord, AppError> {
        form.validate_full()?;

        let insert = form.prepare_for_insert(meta);

        let record = self.contact_repo.insert_contact(&insert).await?;

        tracing::info!(contact_id = %record.id, "Contact submission stored");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::repositories::contact::MockContactRepository;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "4035551234".into(),
            country_code: "+1".into(),
            company: String::new(),
            subject: "Project enquiry".into(),
            service_interest: String::new(),
            budget_range: String::new(),
            message: "We would like a quote for a new marketing site.".into(),
            captcha_token: "tok".into(),
        }
    }

    #[tokio::test]
    async fn create_contact_persists_sanitized_record() {
        let mut repo = MockContactRepository::new();
        repo.expect_insert_contact()
            .withf(|insert| insert.email == "jane@example.com")
            .returning(|insert| Ok(ContactRecord::from_insert(Uuid::new_v4(), insert)));

        let handler = ContactHandler::new(Arc::new(repo) as Arc<dyn ContactRepository>);
        let meta = SubmissionMeta {
            captcha_score: Some(0.7),
            client_ip: "203.0.113.9".into(),
            user_agent: None,
        };

        let record = handler.create_contact(valid_form(), meta).await.unwrap();
        assert_eq!(record.captcha_score, Some(0.7));
    }

    #[tokio::test]
    async fn create_contact_rejects_invalid_payload_without_touching_repo() {
        let repo = MockContactRepository::new();
        let handler = ContactHandler::new(Arc::new(repo) as Arc<dyn ContactRepository>);

        let mut form = valid_form();
        form.email = "nope".into();

        let err = handler
            .create_contact(form, SubmissionMeta::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactInsert, ContactRecord},
    errors::AppError,
    repositories::contact::ContactRepository,
};

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

impl SqlxContactRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn insert_contact(&self, insert: &ContactInsert) -> Result<ContactRecord, AppError> {
        let record = sqlx::query_as::<_, ContactRecord>(
            r#"
            INSERT INTO contacts (
                id, name, email, phone, country_code, company, subject,
                service_interest, budget_range, message, captcha_score,
                client_ip, user_agent, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&insert.name)
        .bind(&insert.email)
        .bind(&insert.phone)
        .bind(&insert.country_code)
        .bind(&insert.company)
        .bind(&insert.subject)
        .bind(&insert.service_interest)
        .bind(&insert.budget_range)
        .bind(&insert.message)
        .bind(insert.captcha_score)
        .bind(&insert.client_ip)
        .bind(&insert.user_agent)
        .bind(insert.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

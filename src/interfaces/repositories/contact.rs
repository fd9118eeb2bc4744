use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    entities::contact::{ContactInsert, ContactRecord},
    errors::AppError,
};

#[automock]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn insert_contact(&self, insert: &ContactInsert) -> Result<ContactRecord, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ContactRepository for Arc<T>
where
    T: ContactRepository + ?Sized,
{
    async fn insert_contact(&self, insert: &ContactInsert) -> Result<ContactRecord, AppError> {
        (**self).insert_contact(insert).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

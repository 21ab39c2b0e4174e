use crate::domain::models::{
    user::User, product::{Product, ProductListing, ProductFilter}, session::Session
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateUsername` when the unique constraint rejects the row.
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<Product, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError>;
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>, AppError>;
    async fn list_by_farmer(&self, farmer_id: &str) -> Result<Vec<Product>, AppError>;
    /// Deletes only when `farmer_id` owns the row. Returns whether a row was removed.
    async fn delete_owned(&self, id: &str, farmer_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AppError>;
    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, AppError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, token_hash: &str, session: &Session) -> Result<(), AppError>;
    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError>;
    async fn update(&self, token_hash: &str, session: &Session) -> Result<(), AppError>;
    async fn delete(&self, token_hash: &str) -> Result<(), AppError>;
}

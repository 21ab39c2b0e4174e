use std::sync::Arc;
use crate::domain::{
    models::user::{Identity, Role, User},
    ports::UserRepository
};
use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{info, warn};

pub struct CredentialService {
    repo: Arc<dyn UserRepository>,
}

impl CredentialService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Duplicate usernames are caught by the storage constraint on insert,
    /// there is no lookup beforehand.
    pub async fn register(&self, username: &str, password: &str, role: Role) -> Result<User, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be empty".into()));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username.to_string(), password_hash, role);
        let created = self.repo.create(&user).await?;

        info!("Registered {} account: {}", created.role, created.id);
        Ok(created)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AppError> {
        let user = self.repo.find_by_username(username).await?
            .ok_or(AppError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Rejected password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        Ok(user.identity())
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("password hashing failed: {}", e)))
}

/// A stored hash that does not parse is an internal fault, not a wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal)?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

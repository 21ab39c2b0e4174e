use std::sync::Arc;
use crate::domain::{
    models::{session::Session, user::Identity},
    ports::SessionRepository
};
use crate::error::AppError;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Sha256, Digest};
use tracing::{debug, info};

pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    pub async fn resume(&self, token: &str) -> Result<Option<Session>, AppError> {
        self.repo.find(&self.hash_token(token)).await
    }

    pub async fn save(&self, token: &str, session: &Session) -> Result<(), AppError> {
        self.repo.update(&self.hash_token(token), session).await
    }

    /// Authenticates `session` and stores it under a freshly issued token.
    /// Any token the client held before is revoked.
    pub async fn login(
        &self,
        previous_token: Option<&str>,
        mut session: Session,
        identity: Identity,
    ) -> Result<(String, Session), AppError> {
        if let Some(previous) = previous_token {
            self.repo.delete(&self.hash_token(previous)).await?;
        }

        info!("User logged in: {} ({})", identity.id, identity.role);
        session.login(identity);

        let token = generate_token();
        self.repo.insert(&self.hash_token(&token), &session).await?;
        debug!("Issued session token");

        Ok((token, session))
    }

    /// Drops the session entirely; identity and cart go with it.
    pub async fn logout(&self, token: Option<&str>, session: &mut Session) -> Result<(), AppError> {
        if let Some(identity) = session.identity() {
            info!("User logged out: {}", identity.id);
        }
        session.logout();
        match token {
            Some(token) => self.repo.delete(&self.hash_token(token)).await,
            None => Ok(()),
        }
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn generate_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

use crate::domain::{models::session::Session, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Sessions live in process memory and vanish on restart.
#[derive(Default)]
pub struct MemorySessionRepo {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepo {
    async fn insert(&self, token_hash: &str, session: &Session) -> Result<(), AppError> {
        self.sessions.write().await.insert(token_hash.to_string(), session.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.read().await.get(token_hash).cloned())
    }

    async fn update(&self, token_hash: &str, session: &Session) -> Result<(), AppError> {
        match self.sessions.write().await.get_mut(token_hash) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Session not found".into())),
        }
    }

    async fn delete(&self, token_hash: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(token_hash);
        Ok(())
    }
}

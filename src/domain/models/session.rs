use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::domain::models::{cart::Cart, user::{Identity, Role}};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    AuthenticatedFarmer(Identity),
    AuthenticatedBuyer(Identity),
}

/// Per-client state: who is logged in and what they have in their cart.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    pub cart: Cart,
    pub created_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Anonymous,
            cart: Cart::default(),
            created_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Anonymous => None,
            SessionState::AuthenticatedFarmer(id) | SessionState::AuthenticatedBuyer(id) => Some(id),
        }
    }

    /// Moves into the authenticated state matching the identity's role.
    /// Switching from another identity drops the previous cart.
    pub fn login(&mut self, identity: Identity) {
        if self.identity().is_some_and(|current| current.id != identity.id) {
            self.cart.clear();
        }
        self.state = match identity.role {
            Role::Farmer => SessionState::AuthenticatedFarmer(identity),
            Role::Buyer => SessionState::AuthenticatedBuyer(identity),
        };
    }

    pub fn logout(&mut self) {
        self.state = SessionState::Anonymous;
        self.cart.clear();
    }

    pub fn require_farmer(&self) -> Result<&Identity, AppError> {
        match &self.state {
            SessionState::AuthenticatedFarmer(id) => Ok(id),
            SessionState::AuthenticatedBuyer(_) => Err(AppError::Forbidden("Login as a farmer to access this section.".into())),
            SessionState::Anonymous => Err(AppError::Unauthorized),
        }
    }

    pub fn require_buyer(&self) -> Result<&Identity, AppError> {
        match &self.state {
            SessionState::AuthenticatedBuyer(id) => Ok(id),
            SessionState::AuthenticatedFarmer(_) => Err(AppError::Forbidden("Login as a buyer to use cart.".into())),
            SessionState::Anonymous => Err(AppError::Unauthorized),
        }
    }
}

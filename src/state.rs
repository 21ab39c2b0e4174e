use std::sync::Arc;
use crate::domain::ports::{BlobStore, ProductRepository, SessionRepository, UserRepository};
use crate::domain::services::{
    cart_service::CartService, catalog_service::CatalogService,
    credential_service::CredentialService, session_service::SessionService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub product_repo: Arc<dyn ProductRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub blob_store: Arc<dyn BlobStore>,
    pub credential_service: Arc<CredentialService>,
    pub catalog_service: Arc<CatalogService>,
    pub cart_service: Arc<CartService>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    /// Wires the services over a set of adapters.
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        product_repo: Arc<dyn ProductRepository>,
        session_repo: Arc<dyn SessionRepository>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            credential_service: Arc::new(CredentialService::new(user_repo.clone())),
            catalog_service: Arc::new(CatalogService::new(product_repo.clone(), blob_store.clone())),
            cart_service: Arc::new(CartService::new(product_repo.clone())),
            session_service: Arc::new(SessionService::new(session_repo.clone())),
            config,
            user_repo,
            product_repo,
            session_repo,
            blob_store,
        }
    }
}

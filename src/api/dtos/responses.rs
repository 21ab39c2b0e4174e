use crate::domain::models::{
    product::{Product, ProductListing},
    session::SessionState,
    user::{Identity, Role},
};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<Identity> for UserProfile {
    fn from(identity: Identity) -> Self {
        Self { id: identity.id, username: identity.username, role: identity.role }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub state: SessionState,
    pub cart_items: usize,
}

#[derive(Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub image_url: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let image_url = image_url(&product.id);
        Self { product, image_url }
    }
}

#[derive(Serialize)]
pub struct ProductListingResponse {
    #[serde(flatten)]
    pub listing: ProductListing,
    pub image_url: String,
}

impl From<ProductListing> for ProductListingResponse {
    fn from(listing: ProductListing) -> Self {
        let image_url = image_url(&listing.id);
        Self { listing, image_url }
    }
}

fn image_url(product_id: &str) -> String {
    format!("/api/v1/products/{}/image", product_id)
}

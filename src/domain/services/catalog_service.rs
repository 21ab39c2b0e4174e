use std::sync::Arc;
use crate::domain::{
    models::product::{NewProduct, Product, ProductFilter, ProductListing},
    ports::{BlobStore, ProductRepository}
};
use crate::error::AppError;
use tracing::{info, warn};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const PLACEHOLDER_IMAGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="150" viewBox="0 0 200 150"><rect width="200" height="150" fill="#e8f5e9"/><text x="100" y="80" font-family="sans-serif" font-size="16" text-anchor="middle" fill="#2e7d32">No image</text></svg>"##;

pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

pub struct ProductImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub placeholder: bool,
}

pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { repo, blobs }
    }

    /// The blob is written before the row; a failed insert leaves the blob orphaned
    /// but the error still reaches the caller.
    pub async fn add_product(&self, draft: NewProduct, image: Option<ImageUpload>) -> Result<Product, AppError> {
        validate_draft(&draft)?;
        let image = image.ok_or_else(|| AppError::Validation("Upload an image".into()))?;
        validate_image(&image)?;

        let image_path = self.blobs.store(&image.bytes, &image.filename).await?;
        let product = Product::new(draft, image_path);

        match self.repo.create(&product).await {
            Ok(created) => {
                info!("Farmer {} listed product {}", created.farmer_id, created.id);
                Ok(created)
            }
            Err(e) => {
                warn!("Product insert failed, blob {} is orphaned", product.image_path);
                Err(e)
            }
        }
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>, AppError> {
        for bound in [filter.min_price, filter.max_price].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(AppError::Validation("Price filters must be finite numbers".into()));
            }
        }
        self.repo.list(filter).await
    }

    pub async fn list_products_by_farmer(&self, farmer_id: &str) -> Result<Vec<Product>, AppError> {
        self.repo.list_by_farmer(farmer_id).await
    }

    /// Only the owning farmer may delete a product.
    pub async fn delete_product(&self, product_id: &str, requester_id: &str) -> Result<(), AppError> {
        let product = self.repo.find_by_id(product_id).await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        if product.farmer_id != requester_id {
            warn!("Farmer {} tried to delete product {} owned by {}", requester_id, product.id, product.farmer_id);
            return Err(AppError::Forbidden("You can only delete your own products".into()));
        }

        if !self.repo.delete_owned(product_id, requester_id).await? {
            return Err(AppError::NotFound("Product not found".into()));
        }

        info!("Deleted product {}", product_id);
        Ok(())
    }

    /// Unreadable blobs degrade to the placeholder; an unknown product is still `NotFound`.
    pub async fn product_image(&self, product_id: &str) -> Result<ProductImage, AppError> {
        let product = self.repo.find_by_id(product_id).await?
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

        match self.blobs.retrieve(&product.image_path).await {
            Ok(bytes) => Ok(ProductImage {
                bytes,
                content_type: content_type_for(&product.image_path),
                placeholder: false,
            }),
            Err(e) => {
                warn!("Image for product {} unavailable: {}", product.id, e);
                Ok(ProductImage {
                    bytes: PLACEHOLDER_IMAGE.as_bytes().to_vec(),
                    content_type: "image/svg+xml",
                    placeholder: true,
                })
            }
        }
    }
}

fn validate_draft(draft: &NewProduct) -> Result<(), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }
    if !draft.price.is_finite() || draft.price < 0.0 {
        return Err(AppError::Validation("Price must be a non-negative number".into()));
    }
    if draft.quantity < 0 {
        return Err(AppError::Validation("Quantity must not be negative".into()));
    }
    Ok(())
}

fn validate_image(image: &ImageUpload) -> Result<(), AppError> {
    if image.bytes.is_empty() {
        return Err(AppError::Validation("Upload an image".into()));
    }
    match extension_of(&image.filename) {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::Validation("Image must be a jpg, jpeg or png file".into())),
    }
}

fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn content_type_for(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

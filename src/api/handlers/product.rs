use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::ListProductsQuery,
    responses::{MessageResponse, ProductListingResponse, ProductResponse},
};
use crate::api::extractors::session::ActiveSession;
use crate::domain::models::product::NewProduct;
use crate::domain::services::catalog_service::ImageUpload;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProductsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    let products = state.catalog_service.list_products(&filter).await?;

    let body: Vec<ProductListingResponse> = products.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

pub async fn add_product(
    State(state): State<Arc<AppState>>,
    active: ActiveSession,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let farmer_id = active.session.require_farmer()?.id.clone();

    let mut title = String::new();
    let mut description = String::new();
    let mut price = None;
    let mut quantity = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload { bytes: bytes.to_vec(), filename });
                }
            }
            "title" | "description" | "price" | "quantity" => {
                let value = field.text().await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;
                match name.as_str() {
                    "title" => title = value,
                    "description" => description = value,
                    "price" => price = Some(value.trim().parse::<f64>()
                        .map_err(|_| AppError::Validation("Price must be a number".into()))?),
                    _ => quantity = Some(value.trim().parse::<i64>()
                        .map_err(|_| AppError::Validation("Quantity must be a whole number".into()))?),
                }
            }
            other => warn!("Ignoring unexpected upload field: {}", other),
        }
    }

    let draft = NewProduct {
        farmer_id,
        title,
        description,
        price: price.ok_or_else(|| AppError::Validation("Price is required".into()))?,
        quantity: quantity.ok_or_else(|| AppError::Validation("Quantity is required".into()))?,
    };

    let created = state.catalog_service.add_product(draft, image).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(created))))
}

pub async fn list_my_products(
    State(state): State<Arc<AppState>>,
    active: ActiveSession,
) -> Result<impl IntoResponse, AppError> {
    let farmer = active.session.require_farmer()?;
    let products = state.catalog_service.list_products_by_farmer(&farmer.id).await?;

    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    active: ActiveSession,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let farmer = active.session.require_farmer()?;
    state.catalog_service.delete_product(&product_id, &farmer.id).await?;

    info!("Farmer {} removed product {}", farmer.id, product_id);
    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted".to_string(),
    }))
}

pub async fn get_product_image(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.catalog_service.product_image(&product_id).await?;
    let placeholder = if image.placeholder { "true" } else { "false" };

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::HeaderName::from_static("x-image-placeholder"), placeholder),
        ],
        image.bytes,
    ))
}

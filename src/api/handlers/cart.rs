use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::AddToCartRequest;
use crate::api::extractors::session::ActiveSession;
use std::sync::Arc;
use serde_json::json;

pub async fn view_cart(
    State(state): State<Arc<AppState>>,
    active: ActiveSession,
) -> Result<impl IntoResponse, AppError> {
    active.session.require_buyer()?;
    let view = state.cart_service.compute_view(&active.session.cart).await?;
    Ok(Json(view))
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    mut active: ActiveSession,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, AppError> {
    active.session.require_buyer()?;
    state.cart_service
        .add_to_cart(&mut active.session.cart, &payload.product_id, payload.quantity)
        .await?;
    active.persist(&state).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Added to cart",
        "cart_items": active.session.cart.len(),
    })))
}

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    mut active: ActiveSession,
) -> Result<impl IntoResponse, AppError> {
    active.session.require_buyer()?;
    let receipt = state.cart_service.checkout(&mut active.session.cart);
    active.persist(&state).await?;

    Ok(Json(receipt))
}

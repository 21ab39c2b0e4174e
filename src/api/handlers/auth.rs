use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest},
    responses::{AuthResponse, MessageResponse, SessionResponse},
};
use crate::api::extractors::session::{clear_session_cookie, set_session_cookie, ActiveSession};
use crate::domain::models::user::Role;
use std::sync::Arc;
use tower_cookies::Cookies;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role: Role = payload.role.parse()
        .map_err(|_| AppError::Validation("Role must be farmer or buyer".into()))?;

    let user = state.credential_service
        .register(&payload.username, &payload.password, role)
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
        user: user.identity().into(),
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    active: ActiveSession,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let identity = state.credential_service
        .authenticate(&payload.username, &payload.password)
        .await?;

    let (token, _) = state.session_service
        .login(active.token.as_deref(), active.session, identity.clone())
        .await?;
    set_session_cookie(&cookies, &token, state.config.cookie_secure);

    Ok(Json(AuthResponse {
        success: true,
        message: format!("Logged in as: {}", identity.username),
        user: identity.into(),
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    mut active: ActiveSession,
) -> Result<impl IntoResponse, AppError> {
    state.session_service.logout(active.token.as_deref(), &mut active.session).await?;
    clear_session_cookie(&cookies);

    Ok(Json(MessageResponse {
        success: true,
        message: "Logged out".to_string(),
    }))
}

pub async fn me(active: ActiveSession) -> Result<impl IntoResponse, AppError> {
    Ok(Json(SessionResponse {
        cart_items: active.session.cart.len(),
        state: active.session.state,
    }))
}

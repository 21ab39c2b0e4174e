use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::session::Session;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::SameSite;
use tracing::Span;

pub const SESSION_COOKIE: &str = "session_id";

/// The caller's session. Without a valid cookie this is an unsaved anonymous
/// session with no token; only login stores a session and issues a cookie.
pub struct ActiveSession {
    pub token: Option<String>,
    pub session: Session,
}

impl ActiveSession {
    pub async fn persist(&self, state: &AppState) -> Result<(), AppError> {
        match &self.token {
            Some(token) => state.session_service.save(token, &self.session).await,
            None => Ok(()),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for ActiveSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .cloned()
            .ok_or(AppError::Internal)?;

        if let Some(cookie) = cookies.get(SESSION_COOKIE) {
            let token = cookie.value().to_string();
            if let Some(session) = state.session_service.resume(&token).await? {
                if let Some(identity) = session.identity() {
                    Span::current().record("user_id", identity.id.as_str());
                }
                return Ok(ActiveSession { token: Some(token), session });
            }
            clear_session_cookie(&cookies);
        }

        Ok(ActiveSession { token: None, session: Session::new() })
    }
}

pub fn set_session_cookie(cookies: &Cookies, token: &str, secure: bool) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
}

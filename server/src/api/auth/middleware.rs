//! Request authentication
//!
//! A bearer token only proves which account is calling. The account must
//! still exist in the users table, and its stored role is what admin
//! routes check, so demotions and deletions apply to tokens already issued.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::api::types::ApiError;
use crate::data::TransactionalService;

/// Reasons a request is turned away with 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    Expired,
    InvalidToken,
    UnknownUser,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "AUTH_REQUIRED",
            Self::Expired => "TOKEN_EXPIRED",
            Self::InvalidToken => "TOKEN_INVALID",
            Self::UnknownUser => "USER_NOT_FOUND",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Authentication required",
            Self::Expired => "Session has expired",
            Self::InvalidToken => "Invalid session token",
            Self::UnknownUser => "The account for this token no longer exists",
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => Self::Expired,
            JwtError::InvalidSignature | JwtError::Invalid(_) => Self::InvalidToken,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::unauthorized(e.code(), e.message())
    }
}

/// State for `require_auth`
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub database: Arc<TransactionalService>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    if !state.auth_manager.is_enabled() {
        return Ok(AuthContext::LocalDefault);
    }

    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = state
        .auth_manager
        .validate_session(token)
        .map_err(AuthError::from)?;

    let user = state
        .database
        .repository()
        .get_user(claims.user_id())
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.user_id(), "Token subject has no user row");
            AuthError::UnknownUser
        })?;

    Ok(AuthContext::from_user(user))
}

/// Resolve the caller and store an `AuthContext` in the request extensions.
///
/// With auth disabled every request runs as the local admin.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

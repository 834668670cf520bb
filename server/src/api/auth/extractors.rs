//! Authorization extractors for Axum handlers
//!
//! Read the `AuthContext` injected by `require_auth` and apply the route's
//! role requirement in the same extraction step.
//!
//! # Usage
//!
//! ```no_run
//! # use storefront_server::api::auth::AdminUser;
//! # use storefront_server::api::types::ApiError;
//! pub async fn delete_product(admin: AdminUser) -> Result<(), ApiError> {
//!     let _user_id = admin.ctx.user_id();
//!     Ok(())
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::context::AuthContext;
use crate::api::types::ApiError;

/// Rejection type for auth extractors
pub enum AuthRejection {
    /// Authorization failed
    Auth(ApiError),
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl From<ApiError> for AuthRejection {
    fn from(e: ApiError) -> Self {
        Self::Auth(e)
    }
}

impl axum::response::IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Auth(e) => e.into_response(),
            Self::MissingContext => {
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

fn extract_auth(parts: &Parts) -> Result<AuthContext, AuthRejection> {
    parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .ok_or(AuthRejection::MissingContext)
}

/// Any authenticated caller
pub struct AuthUser {
    pub ctx: AuthContext,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            ctx: extract_auth(parts)?,
        })
    }
}

/// Authenticated caller with the admin role
pub struct AdminUser {
    pub ctx: AuthContext,
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = extract_auth(parts)?;
        if !ctx.is_admin() {
            return Err(ApiError::forbidden(
                "ADMIN_REQUIRED",
                "This operation requires the admin role",
            )
            .into());
        }
        Ok(Self { ctx })
    }
}

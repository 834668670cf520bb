//! User account endpoints
//!
//! Accounts are registered by the `token` CLI command; these routes read
//! and edit them. Role changes take effect on the caller's next request
//! because `require_auth` reads the stored role.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::auth::{AdminUser, AuthUser};
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::types::{UserRow, UserUpdate};
use crate::data::{DataError, TransactionalService};

use types::{AdminUpdateUserRequest, UpdateProfileRequest, UserDto, UsersResponse};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<TransactionalService>,
}

/// Build user routes (auth middleware applied by the server)
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = UsersApiState { database };

    Router::new()
        .route("/me", get(get_profile))
        .route("/me/update", put(update_profile))
        .route("/admin/users", get(list_users))
        .route(
            "/admin/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

fn user_not_found(id: &str) -> ApiError {
    ApiError::not_found("USER_NOT_FOUND", format!("User not found: {}", id))
}

fn map_update_error(e: DataError) -> ApiError {
    if e.is_unique_violation() {
        return ApiError::conflict("EMAIL_TAKEN", "Email is already in use");
    }
    ApiError::from_data(e)
}

fn require_changes(update: &UserUpdate) -> Result<(), ApiError> {
    if update.is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_UPDATE",
            "At least one field must be provided",
        ));
    }
    Ok(())
}

async fn apply_update(
    state: &UsersApiState,
    id: &str,
    update: &UserUpdate,
) -> Result<UserRow, ApiError> {
    state
        .database
        .repository()
        .update_user(id, update)
        .await
        .map_err(map_update_error)?
        .ok_or_else(|| user_not_found(id))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "users",
    responses(
        (status = 200, description = "Caller's profile", body = UserDto),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No stored profile")
    )
)]
pub async fn get_profile(
    State(state): State<UsersApiState>,
    user: AuthUser,
) -> Result<Json<UserDto>, ApiError> {
    let id = user.ctx.user_id();
    let row = state
        .database
        .repository()
        .get_user(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(row.into()))
}

/// Update the caller's name or email
#[utoipa::path(
    put,
    path = "/api/v1/me/update",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Invalid or empty update"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_profile(
    State(state): State<UsersApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let update = UserUpdate::from(body);
    require_changes(&update)?;

    let row = apply_update(&state, user.ctx.user_id(), &update).await?;
    Ok(Json(row.into()))
}

/// List all users (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    _admin: AdminUser,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .database
        .repository()
        .list_users()
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(UsersResponse {
        count: users.len(),
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// Get any user (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<Json<UserDto>, ApiError> {
    let row = state
        .database
        .repository()
        .get_user(&id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| user_not_found(&id))?;

    Ok(Json(row.into()))
}

/// Change a user's name, email or role (admin)
#[utoipa::path(
    put,
    path = "/api/v1/admin/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    admin: AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<AdminUpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let update = UserUpdate::from(body);
    require_changes(&update)?;

    let row = apply_update(&state, &id, &update).await?;

    if let Some(role) = update.role {
        tracing::info!(user_id = %id, role = %role, by = %admin.ctx.user_id(), "User role set");
    }
    Ok(Json(row.into()))
}

/// Delete a user (admin). Their reviews and orders are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .database
        .repository()
        .delete_user(&id)
        .await
        .map_err(ApiError::from_data)?;

    if !deleted {
        return Err(user_not_found(&id));
    }

    tracing::debug!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

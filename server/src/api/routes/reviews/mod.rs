//! Review API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::auth::AuthUser;
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::TransactionalService;
use crate::data::types::RatingSummary;

use types::{DeleteReviewQuery, ReviewDto, ReviewsQuery, ReviewsResponse, UpsertReviewRequest};

/// Shared state for Reviews API endpoints
#[derive(Clone)]
pub struct ReviewsApiState {
    pub database: Arc<TransactionalService>,
}

/// Build review routes (auth middleware applied by the server)
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = ReviewsApiState { database };

    Router::new()
        .route("/review", put(upsert_review))
        .route("/reviews", get(list_reviews).delete(delete_review))
        .with_state(state)
}

fn product_not_found(id: &str) -> ApiError {
    ApiError::not_found("PRODUCT_NOT_FOUND", format!("Product not found: {}", id))
}

/// Create or replace the caller's review of a product
#[utoipa::path(
    put,
    path = "/api/v1/review",
    tag = "reviews",
    request_body = UpsertReviewRequest,
    responses(
        (status = 200, description = "Review stored; returns the product rating summary", body = RatingSummary),
        (status = 400, description = "Invalid rating or comment"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn upsert_review(
    State(state): State<ReviewsApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<UpsertReviewRequest>,
) -> Result<Json<RatingSummary>, ApiError> {
    let summary = state
        .database
        .repository()
        .upsert_review(
            &body.product_id,
            user.ctx.user_id(),
            user.ctx.display_name(),
            body.rating,
            body.comment.trim(),
        )
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| product_not_found(&body.product_id))?;

    tracing::debug!(
        product_id = %body.product_id,
        user_id = %user.ctx.user_id(),
        ratings = summary.ratings,
        "Review stored"
    );
    Ok(Json(summary))
}

/// List reviews of a product
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "reviews",
    params(ReviewsQuery),
    responses(
        (status = 200, description = "Reviews of the product", body = ReviewsResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn list_reviews(
    State(state): State<ReviewsApiState>,
    _user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ReviewsQuery>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let repo = state.database.repository();

    repo.get_product(&query.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| product_not_found(&query.id))?;

    let reviews = repo
        .list_reviews(&query.id)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(ReviewDto::from).collect(),
    }))
}

/// Delete a review (author or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/reviews",
    tag = "reviews",
    params(DeleteReviewQuery),
    responses(
        (status = 200, description = "Review deleted; returns the product rating summary", body = RatingSummary),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Product or review not found")
    )
)]
pub async fn delete_review(
    State(state): State<ReviewsApiState>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DeleteReviewQuery>,
) -> Result<Json<RatingSummary>, ApiError> {
    let repo = state.database.repository();

    repo.get_product(&query.product_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| product_not_found(&query.product_id))?;

    let review_not_found =
        || ApiError::not_found("REVIEW_NOT_FOUND", format!("Review not found: {}", query.id));

    let review = repo
        .get_review(&query.product_id, &query.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(review_not_found)?;

    user.ctx.require_owner_or_admin(&review.user_id)?;

    // Concurrent delete between lookup and delete
    let summary = repo
        .delete_review(&query.product_id, &query.id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(review_not_found)?;

    Ok(Json(summary))
}

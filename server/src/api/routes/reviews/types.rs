//! Review API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::validate_not_blank;
use crate::core::constants::MAX_REVIEW_COMMENT_LEN;
use crate::data::types::ReviewRow;
use crate::domain::reviews::{MAX_RATING, MIN_RATING};

/// Review DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewDto {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            name: row.name,
            rating: row.rating,
            comment: row.comment,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Request body for creating or replacing the caller's review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertReviewRequest {
    #[validate(length(min = 1, max = 256, message = "Invalid product_id"))]
    pub product_id: String,

    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be 1-5"))]
    pub rating: i64,

    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_REVIEW_COMMENT_LEN, message = "Comment cannot exceed 2000 characters")
    )]
    pub comment: String,
}

/// Query parameters for listing reviews
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewsQuery {
    /// Product ID
    #[validate(length(min = 1, max = 256, message = "Invalid product id"))]
    pub id: String,
}

/// Query parameters for deleting a review
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteReviewQuery {
    /// Product ID
    #[validate(length(min = 1, max = 256, message = "Invalid product_id"))]
    pub product_id: String,
    /// Review ID
    #[validate(length(min = 1, max = 256, message = "Invalid review id"))]
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewDto>,
}

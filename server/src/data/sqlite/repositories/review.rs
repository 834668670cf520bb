//! Review repository for SQLite operations
//!
//! Every write recomputes the parent product's `ratings` and
//! `num_of_reviews` inside the same transaction as the review change.

use sqlx::{SqliteConnection, SqlitePool};

use crate::data::sqlite::SqliteError;
use crate::data::types::{RatingSummary, ReviewRow};

const REVIEW_COLUMNS: &str =
    "id, product_id, user_id, name, rating, comment, created_at, updated_at";

type ReviewTuple = (String, String, String, String, i64, String, i64, i64);

fn row_to_review(row: ReviewTuple) -> ReviewRow {
    let (id, product_id, user_id, name, rating, comment, created_at, updated_at) = row;
    ReviewRow {
        id,
        product_id,
        user_id,
        name,
        rating,
        comment,
        created_at,
        updated_at,
    }
}

async fn product_exists(conn: &mut SqliteConnection, product_id: &str) -> Result<bool, SqliteError> {
    let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Recompute and store the rating summary of a product from its current reviews
async fn recompute_summary(
    conn: &mut SqliteConnection,
    product_id: &str,
) -> Result<RatingSummary, SqliteError> {
    let ratings: Vec<i64> = sqlx::query_scalar("SELECT rating FROM reviews WHERE product_id = ?")
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await?;

    let summary = RatingSummary::from_ratings(&ratings);

    sqlx::query("UPDATE products SET ratings = ?, num_of_reviews = ? WHERE id = ?")
        .bind(summary.ratings)
        .bind(summary.num_of_reviews)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    Ok(summary)
}

/// Create or replace the caller's review of a product.
///
/// Returns `None` when the product does not exist.
pub async fn upsert_review(
    pool: &SqlitePool,
    product_id: &str,
    user_id: &str,
    name: &str,
    rating: i64,
    comment: &str,
) -> Result<Option<RatingSummary>, SqliteError> {
    let mut tx = pool.begin().await?;

    if !product_exists(&mut tx, product_id).await? {
        return Ok(None);
    }

    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO reviews (id, product_id, user_id, name, rating, comment, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(product_id, user_id) DO UPDATE SET
            name = excluded.name,
            rating = excluded.rating,
            comment = excluded.comment,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&id)
    .bind(product_id)
    .bind(user_id)
    .bind(name)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let summary = recompute_summary(&mut tx, product_id).await?;

    tx.commit().await?;

    tracing::debug!(%product_id, %user_id, rating, "Review saved");
    Ok(Some(summary))
}

/// List reviews of a product, oldest first
pub async fn list_reviews(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<Vec<ReviewRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM reviews WHERE product_id = ? ORDER BY created_at, id",
        REVIEW_COLUMNS
    );
    let rows = sqlx::query_as::<_, ReviewTuple>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_to_review).collect())
}

/// Get a single review of a product
pub async fn get_review(
    pool: &SqlitePool,
    product_id: &str,
    review_id: &str,
) -> Result<Option<ReviewRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM reviews WHERE product_id = ? AND id = ?",
        REVIEW_COLUMNS
    );
    let row = sqlx::query_as::<_, ReviewTuple>(&sql)
        .bind(product_id)
        .bind(review_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(row_to_review))
}

/// Delete a review and recompute the product's summary from the remaining reviews.
///
/// Returns `None` when the review does not belong to the product.
pub async fn delete_review(
    pool: &SqlitePool,
    product_id: &str,
    review_id: &str,
) -> Result<Option<RatingSummary>, SqliteError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM reviews WHERE product_id = ? AND id = ?")
        .bind(product_id)
        .bind(review_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    let summary = recompute_summary(&mut tx, product_id).await?;

    tx.commit().await?;

    tracing::debug!(%product_id, %review_id, "Review deleted");
    Ok(Some(summary))
}

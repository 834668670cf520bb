//! Repository traits for database backends
//!
//! Route handlers talk to storage only through these traits, obtained from
//! `TransactionalService::repository()`.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::filters::ProductQuery;
use crate::data::types::{
    NewOrder, NewProduct, NewUser, OrderRow, OrderStatus, OrderStatusUpdate, ProductRow,
    ProductUpdate, RatingSummary, ReviewRow, UserRow, UserUpdate,
};

/// Repository trait for catalog, order and user operations
///
/// Implemented by the SQLite backend.
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== Product Operations ====================

    /// Create a product; ratings start at zero
    async fn create_product(&self, input: &NewProduct) -> Result<ProductRow, DataError>;

    /// Get a product by ID
    async fn get_product(&self, id: &str) -> Result<Option<ProductRow>, DataError>;

    /// List products matching a built query, with the total match count
    async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<(Vec<ProductRow>, u64), DataError>;

    /// List every product (unpaginated)
    async fn list_all_products(&self) -> Result<Vec<ProductRow>, DataError>;

    /// Apply a partial update. Returns None if the product doesn't exist.
    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
    ) -> Result<Option<ProductRow>, DataError>;

    /// Delete a product and its reviews. Returns true if deleted.
    async fn delete_product(&self, id: &str) -> Result<bool, DataError>;

    // ==================== Review Operations ====================

    /// Create or replace a user's review and recompute the product summary.
    /// Returns None if the product doesn't exist.
    async fn upsert_review(
        &self,
        product_id: &str,
        user_id: &str,
        name: &str,
        rating: i64,
        comment: &str,
    ) -> Result<Option<RatingSummary>, DataError>;

    /// List reviews of a product
    async fn list_reviews(&self, product_id: &str) -> Result<Vec<ReviewRow>, DataError>;

    /// Get a review of a product
    async fn get_review(
        &self,
        product_id: &str,
        review_id: &str,
    ) -> Result<Option<ReviewRow>, DataError>;

    /// Delete a review and recompute the product summary.
    /// Returns None if the review doesn't exist.
    async fn delete_review(
        &self,
        product_id: &str,
        review_id: &str,
    ) -> Result<Option<RatingSummary>, DataError>;

    // ==================== Order Operations ====================

    /// Create an order for a user
    async fn create_order(&self, user_id: &str, input: &NewOrder)
    -> Result<OrderRow, DataError>;

    /// Get an order by ID
    async fn get_order(&self, id: &str) -> Result<Option<OrderRow>, DataError>;

    /// List a user's orders
    async fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRow>, DataError>;

    /// List all orders
    async fn list_orders(&self) -> Result<Vec<OrderRow>, DataError>;

    /// Move an order to a new status (Delivered is final)
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<OrderStatusUpdate, DataError>;

    /// Delete an order. Returns true if deleted.
    async fn delete_order(&self, id: &str) -> Result<bool, DataError>;

    // ==================== User Operations ====================

    /// Insert a user, or refresh name and role of an existing one
    async fn upsert_user(&self, input: &NewUser) -> Result<UserRow, DataError>;

    /// Get a user by ID
    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError>;

    /// List all users
    async fn list_users(&self) -> Result<Vec<UserRow>, DataError>;

    /// Apply a partial update. Returns None if the user doesn't exist.
    async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<Option<UserRow>, DataError>;

    /// Delete a user. Returns true if deleted.
    async fn delete_user(&self, id: &str) -> Result<bool, DataError>;
}

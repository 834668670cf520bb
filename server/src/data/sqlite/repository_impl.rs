//! TransactionalRepository trait implementation for SQLite
//!
//! This module implements the TransactionalRepository trait for Arc<SqliteService>,
//! delegating each operation to the repository functions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::filters::ProductQuery;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    NewOrder, NewProduct, NewUser, OrderRow, OrderStatus, OrderStatusUpdate, ProductRow,
    ProductUpdate, RatingSummary, ReviewRow, UserRow, UserUpdate,
};

use super::SqliteService;
use super::repositories::{order, product, review, user};

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== Product Operations ====================

    async fn create_product(&self, input: &NewProduct) -> Result<ProductRow, DataError> {
        product::create_product(self.pool(), input)
            .await
            .map_err(Into::into)
    }

    async fn get_product(&self, id: &str) -> Result<Option<ProductRow>, DataError> {
        product::get_product(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<(Vec<ProductRow>, u64), DataError> {
        product::list_products(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn list_all_products(&self) -> Result<Vec<ProductRow>, DataError> {
        product::list_all_products(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
    ) -> Result<Option<ProductRow>, DataError> {
        product::update_product(self.pool(), id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_product(&self, id: &str) -> Result<bool, DataError> {
        product::delete_product(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== Review Operations ====================

    async fn upsert_review(
        &self,
        product_id: &str,
        user_id: &str,
        name: &str,
        rating: i64,
        comment: &str,
    ) -> Result<Option<RatingSummary>, DataError> {
        review::upsert_review(self.pool(), product_id, user_id, name, rating, comment)
            .await
            .map_err(Into::into)
    }

    async fn list_reviews(&self, product_id: &str) -> Result<Vec<ReviewRow>, DataError> {
        review::list_reviews(self.pool(), product_id)
            .await
            .map_err(Into::into)
    }

    async fn get_review(
        &self,
        product_id: &str,
        review_id: &str,
    ) -> Result<Option<ReviewRow>, DataError> {
        review::get_review(self.pool(), product_id, review_id)
            .await
            .map_err(Into::into)
    }

    async fn delete_review(
        &self,
        product_id: &str,
        review_id: &str,
    ) -> Result<Option<RatingSummary>, DataError> {
        review::delete_review(self.pool(), product_id, review_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Order Operations ====================

    async fn create_order(&self, user_id: &str, input: &NewOrder) -> Result<OrderRow, DataError> {
        order::create_order(self.pool(), user_id, input)
            .await
            .map_err(Into::into)
    }

    async fn get_order(&self, id: &str) -> Result<Option<OrderRow>, DataError> {
        order::get_order(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRow>, DataError> {
        order::list_for_user(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRow>, DataError> {
        order::list_orders(self.pool()).await.map_err(Into::into)
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<OrderStatusUpdate, DataError> {
        order::update_order_status(self.pool(), id, status)
            .await
            .map_err(Into::into)
    }

    async fn delete_order(&self, id: &str) -> Result<bool, DataError> {
        order::delete_order(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== User Operations ====================

    async fn upsert_user(&self, input: &NewUser) -> Result<UserRow, DataError> {
        user::upsert_user(self.pool(), input)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), id).await.map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<UserRow>, DataError> {
        user::list_users(self.pool()).await.map_err(Into::into)
    }

    async fn update_user(
        &self,
        id: &str,
        update: &UserUpdate,
    ) -> Result<Option<UserRow>, DataError> {
        user::update_user(self.pool(), id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: &str) -> Result<bool, DataError> {
        user::delete_user(self.pool(), id).await.map_err(Into::into)
    }
}

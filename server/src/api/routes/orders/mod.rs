//! Order API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::auth::{AdminUser, AuthUser};
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::TransactionalService;
use crate::data::types::{NewOrder, OrderStatusUpdate};

use types::{
    AdminOrdersResponse, CreateOrderRequest, MyOrdersResponse, OrderDto, UpdateOrderStatusRequest,
};

/// Shared state for Orders API endpoints
#[derive(Clone)]
pub struct OrdersApiState {
    pub database: Arc<TransactionalService>,
}

/// Build order routes (auth middleware applied by the server)
pub fn routes(database: Arc<TransactionalService>) -> Router<()> {
    let state = OrdersApiState { database };

    Router::new()
        .route("/order/new", post(create_order))
        .route("/order/{id}", get(get_order))
        .route("/orders/me", get(my_orders))
        .route("/admin/orders", get(list_orders))
        .route(
            "/admin/order/{id}",
            put(update_order_status).delete(delete_order),
        )
        .with_state(state)
}

fn order_not_found(id: &str) -> ApiError {
    ApiError::not_found("ORDER_NOT_FOUND", format!("Order not found: {}", id))
}

/// Place an order for the caller
#[utoipa::path(
    post,
    path = "/api/v1/order/new",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDto),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn create_order(
    State(state): State<OrdersApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    let input = NewOrder::from(body);

    let order = state
        .database
        .repository()
        .create_order(user.ctx.user_id(), &input)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(order_id = %order.id, user_id = %order.user_id, "Order created");
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Get an order (owner or admin)
#[utoipa::path(
    get,
    path = "/api/v1/order/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderDto),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<OrdersApiState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<OrderDto>, ApiError> {
    let order = state
        .database
        .repository()
        .get_order(&id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| order_not_found(&id))?;

    user.ctx.require_owner_or_admin(&order.user_id)?;

    Ok(Json(order.into()))
}

/// List the caller's orders
#[utoipa::path(
    get,
    path = "/api/v1/orders/me",
    tag = "orders",
    responses(
        (status = 200, description = "Caller's orders", body = MyOrdersResponse),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn my_orders(
    State(state): State<OrdersApiState>,
    user: AuthUser,
) -> Result<Json<MyOrdersResponse>, ApiError> {
    let orders = state
        .database
        .repository()
        .list_orders_for_user(user.ctx.user_id())
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(MyOrdersResponse {
        count: orders.len(),
        orders: orders.into_iter().map(OrderDto::from).collect(),
    }))
}

/// List all orders (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "orders",
    responses(
        (status = 200, description = "All orders", body = AdminOrdersResponse),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_orders(
    State(state): State<OrdersApiState>,
    _admin: AdminUser,
) -> Result<Json<AdminOrdersResponse>, ApiError> {
    let orders = state
        .database
        .repository()
        .list_orders()
        .await
        .map_err(ApiError::from_data)?;

    let total_amount = orders.iter().map(|o| o.total_price).sum();

    Ok(Json(AdminOrdersResponse {
        count: orders.len(),
        total_amount,
        orders: orders.into_iter().map(OrderDto::from).collect(),
    }))
}

/// Change an order's status (admin)
///
/// Delivered orders are final. Delivering stamps `delivered_at`.
#[utoipa::path(
    put,
    path = "/api/v1/admin/order/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderDto),
        (status = 400, description = "Order already delivered"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<OrdersApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<OrderDto>, ApiError> {
    let outcome = state
        .database
        .repository()
        .update_order_status(&id, body.status)
        .await
        .map_err(ApiError::from_data)?;

    match outcome {
        OrderStatusUpdate::Updated(order) => {
            tracing::debug!(order_id = %id, status = %order.order_status, "Order status updated");
            Ok(Json(order.into()))
        }
        OrderStatusUpdate::AlreadyDelivered => Err(ApiError::bad_request(
            "ORDER_ALREADY_DELIVERED",
            "This order has already been delivered",
        )),
        OrderStatusUpdate::NotFound => Err(order_not_found(&id)),
    }
}

/// Delete an order (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/admin/order/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    State(state): State<OrdersApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .database
        .repository()
        .delete_order(&id)
        .await
        .map_err(ApiError::from_data)?;

    if !deleted {
        return Err(order_not_found(&id));
    }

    Ok(StatusCode::NO_CONTENT)
}

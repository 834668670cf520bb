//! Order API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::validate_not_blank;
use crate::core::constants::MAX_ORDER_ITEMS;
use crate::data::types::{
    NewOrder, OrderItem, OrderRow, OrderStatus, PaymentInfo, ShippingInfo,
};

/// Order DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    pub payment_info: PaymentInfo,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub order_status: OrderStatus,
    pub paid_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for OrderDto {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            items: row.items,
            shipping_info: row.shipping_info,
            payment_info: row.payment_info,
            items_price: row.items_price,
            tax_price: row.tax_price,
            shipping_price: row.shipping_price,
            total_price: row.total_price,
            order_status: row.order_status,
            paid_at: DateTime::from_timestamp(row.paid_at, 0).unwrap_or_else(Utc::now),
            delivered_at: row
                .delivered_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Caller's orders
#[derive(Debug, Serialize, ToSchema)]
pub struct MyOrdersResponse {
    pub count: usize,
    pub orders: Vec<OrderDto>,
}

/// All orders with revenue total
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrdersResponse {
    pub count: usize,
    /// Sum of `total_price` over all orders
    pub total_amount: f64,
    pub orders: Vec<OrderDto>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    #[validate(length(min = 1, max = 256, message = "Invalid product_id"))]
    pub product_id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: f64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    #[validate(custom(function = "validate_not_blank"))]
    pub image: String,
}

impl From<OrderItemInput> for OrderItem {
    fn from(input: OrderItemInput) -> Self {
        Self {
            product_id: input.product_id,
            name: input.name.trim().to_string(),
            price: input.price,
            quantity: input.quantity,
            image: input.image.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ShippingInfoInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub address: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub city: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub phone_no: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub postal_code: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub country: String,
}

impl From<ShippingInfoInput> for ShippingInfo {
    fn from(input: ShippingInfoInput) -> Self {
        Self {
            address: input.address.trim().to_string(),
            city: input.city.trim().to_string(),
            phone_no: input.phone_no.trim().to_string(),
            postal_code: input.postal_code.trim().to_string(),
            country: input.country.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PaymentInfoInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub status: String,
}

impl From<PaymentInfoInput> for PaymentInfo {
    fn from(input: PaymentInfoInput) -> Self {
        Self {
            id: input.id.trim().to_string(),
            status: input.status.trim().to_string(),
        }
    }
}

/// Request body for placing an order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(
        length(min = 1, max = MAX_ORDER_ITEMS, message = "Orders need 1-100 items"),
        nested
    )]
    pub items: Vec<OrderItemInput>,
    #[validate(nested)]
    pub shipping_info: ShippingInfoInput,
    #[validate(nested)]
    pub payment_info: PaymentInfoInput,
    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub items_price: f64,
    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub tax_price: f64,
    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub shipping_price: f64,
    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub total_price: f64,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            items: req.items.into_iter().map(Into::into).collect(),
            shipping_info: req.shipping_info.into(),
            payment_info: req.payment_info.into(),
            items_price: req.items_price,
            tax_price: req.tax_price,
            shipping_price: req.shipping_price,
            total_price: req.total_price,
        }
    }
}

/// Request body for changing an order's status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

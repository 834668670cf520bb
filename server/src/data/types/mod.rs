//! Shared data types
//!
//! Row and input types exchanged between the repositories and the API layer.

mod catalog;
mod orders;
mod users;

pub use catalog::{
    NewProduct, ProductCategory, ProductFeature, ProductRow, ProductUpdate, RatingSummary,
    ReviewRow,
};
pub use orders::{
    NewOrder, OrderItem, OrderRow, OrderStatus, OrderStatusUpdate, PaymentInfo, ShippingInfo,
};
pub use users::{NewUser, Role, UserRow, UserUpdate};

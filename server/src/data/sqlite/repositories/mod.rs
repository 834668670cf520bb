//! SQLite repositories
//!
//! Types (ProductRow, ReviewRow, etc.) should be imported from `crate::data::types`.

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{
    create_order, delete_order, get_order, list_for_user as list_orders_for_user, list_orders,
    update_order_status,
};
pub use product::{
    create_product, delete_product, get_product, list_all_products, list_products,
    update_product,
};
pub use review::{delete_review, get_review, list_reviews, upsert_review};
pub use user::{delete_user, get_user, list_users, update_user, upsert_user};

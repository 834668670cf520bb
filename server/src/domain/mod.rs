//! Domain rules shared by the repositories and routes
//!
//! - `reviews` - derived rating summary of a product
//! - `orders` - order status transitions

pub mod orders;
pub mod reviews;

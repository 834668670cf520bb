//! Storefront server
//!
//! REST backend for a product catalog with reviews and orders.

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

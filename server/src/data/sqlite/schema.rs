//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Products
-- images and features are JSON arrays; ratings/num_of_reviews are derived
-- from the reviews table and only written by the review operations.
-- name_folded is the Unicode-lowercased name used by keyword search
-- =============================================================================
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    name_folded TEXT NOT NULL,
    price REAL NOT NULL CHECK(price >= 0),
    description TEXT NOT NULL CHECK(length(description) >= 1),
    images TEXT NOT NULL DEFAULT '[]',
    category TEXT NOT NULL CHECK(category IN ('phones', 'gadgets', 'accessories', 'other')),
    brand TEXT NOT NULL CHECK(length(brand) >= 1),
    stock INTEGER NOT NULL DEFAULT 0 CHECK(stock >= 0),
    ratings REAL NOT NULL DEFAULT 0 CHECK(ratings >= 0 AND ratings <= 5),
    num_of_reviews INTEGER NOT NULL DEFAULT 0 CHECK(num_of_reviews >= 0),
    features TEXT NOT NULL DEFAULT '[]',
    created_by TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_created ON products(created_at DESC, id);
CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
CREATE INDEX IF NOT EXISTS idx_products_price ON products(price);

-- =============================================================================
-- 2. Reviews (references products, one per user per product)
-- =============================================================================
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK(rating >= 1 AND rating <= 5),
    comment TEXT NOT NULL CHECK(length(comment) >= 1),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(product_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id, created_at);

-- =============================================================================
-- 3. Orders
-- items, shipping_info and payment_info are JSON snapshots taken at checkout
-- =============================================================================
CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    items TEXT NOT NULL,
    shipping_info TEXT NOT NULL,
    payment_info TEXT NOT NULL,
    items_price REAL NOT NULL CHECK(items_price >= 0),
    tax_price REAL NOT NULL CHECK(tax_price >= 0),
    shipping_price REAL NOT NULL CHECK(shipping_price >= 0),
    total_price REAL NOT NULL CHECK(total_price >= 0),
    order_status TEXT NOT NULL DEFAULT 'Processing' CHECK(order_status IN ('Processing', 'Shipped', 'Delivered')),
    paid_at INTEGER NOT NULL,
    delivered_at INTEGER,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id, created_at DESC);

-- =============================================================================
-- 4. Users
-- IDs come from the issuing side (token subject), not generated here.
-- Reviews and orders keep their user_id after the user row is deleted
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 50),
    email TEXT UNIQUE,
    role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('user', 'admin')),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_created ON users(created_at DESC, id);
"#;

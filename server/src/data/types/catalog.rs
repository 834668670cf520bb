//! Catalog row types (products and reviews)

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Product types
// ============================================================================

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Phones,
    Gadgets,
    Accessories,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Phones,
        ProductCategory::Gadgets,
        ProductCategory::Accessories,
        ProductCategory::Other,
    ];

    /// Parse from string representation (exact, lowercase)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "phones" => Some(Self::Phones),
            "gadgets" => Some(Self::Gadgets),
            "accessories" => Some(Self::Accessories),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phones => "phones",
            Self::Gadgets => "gadgets",
            Self::Accessories => "accessories",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name/value feature pair shown on the product page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductFeature {
    pub name: String,
    pub value: String,
}

/// Product row from database
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub category: ProductCategory,
    pub brand: String,
    pub stock: i64,
    /// Mean rating of all reviews (0 without reviews)
    pub ratings: f64,
    pub num_of_reviews: i64,
    pub features: Vec<ProductFeature>,
    pub created_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Validated input for a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub category: ProductCategory,
    pub brand: String,
    pub stock: i64,
    pub features: Vec<ProductFeature>,
    pub created_by: Option<String>,
}

/// Validated partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<ProductCategory>,
    pub brand: Option<String>,
    pub stock: Option<i64>,
    pub features: Option<Vec<ProductFeature>>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.images.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.stock.is_none()
            && self.features.is_none()
    }
}

// ============================================================================
// Review types
// ============================================================================

/// Review row from database
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewRow {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    /// Display name captured when the review was written
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Derived rating columns of a product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct RatingSummary {
    pub ratings: f64,
    pub num_of_reviews: i64,
}

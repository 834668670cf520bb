//! Product API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::routes::reviews::types::ReviewDto;
use crate::api::types::{ApiError, validate_category, validate_image_uris, validate_not_blank};
use crate::core::constants::{MAX_PRODUCT_IMAGES, MAX_PRODUCT_NAME_LEN};
use crate::data::types::{
    NewProduct, ProductCategory, ProductFeature, ProductRow, ProductUpdate,
};

/// Product DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub images: Vec<String>,
    pub category: ProductCategory,
    pub brand: String,
    pub stock: i64,
    pub ratings: f64,
    pub num_of_reviews: i64,
    pub features: Vec<ProductFeature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductDto {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            images: row.images,
            category: row.category,
            brand: row.brand,
            stock: row.stock,
            ratings: row.ratings,
            num_of_reviews: row.num_of_reviews,
            features: row.features,
            created_by: row.created_by,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Product with its reviews
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailResponse {
    pub product: ProductDto,
    pub reviews: Vec<ReviewDto>,
}

/// Unpaginated admin product listing
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductsResponse {
    pub count: usize,
    pub data: Vec<ProductDto>,
}

/// Feature pair in product request bodies
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductFeatureInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub value: String,
}

impl From<ProductFeatureInput> for ProductFeature {
    fn from(input: ProductFeatureInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            value: input.value.trim().to_string(),
        }
    }
}

fn parse_category(value: &str) -> Result<ProductCategory, ApiError> {
    ProductCategory::parse(value).ok_or_else(|| {
        ApiError::bad_request("INVALID_CATEGORY", format!("Invalid category '{}'", value))
    })
}

/// Request body for creating a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_PRODUCT_NAME_LEN, message = "Name cannot exceed 100 characters")
    )]
    pub name: String,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: f64,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(
        length(min = 1, max = MAX_PRODUCT_IMAGES, message = "Products need 1-20 images"),
        custom(function = "validate_image_uris")
    )]
    pub images: Vec<String>,

    /// One of: phones, gadgets, accessories, other
    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub brand: String,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must be >= 0"))]
    pub stock: i64,

    #[serde(default)]
    #[validate(nested)]
    pub features: Vec<ProductFeatureInput>,
}

impl CreateProductRequest {
    pub fn into_new_product(self, created_by: &str) -> Result<NewProduct, ApiError> {
        Ok(NewProduct {
            name: self.name.trim().to_string(),
            price: self.price,
            description: self.description.trim().to_string(),
            images: self.images.into_iter().map(|i| i.trim().to_string()).collect(),
            category: parse_category(&self.category)?,
            brand: self.brand.trim().to_string(),
            stock: self.stock,
            features: self.features.into_iter().map(Into::into).collect(),
            created_by: Some(created_by.to_string()),
        })
    }
}

/// Request body for a partial product update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_PRODUCT_NAME_LEN, message = "Name cannot exceed 100 characters")
    )]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,

    #[validate(
        length(min = 1, max = MAX_PRODUCT_IMAGES, message = "Products need 1-20 images"),
        custom(function = "validate_image_uris")
    )]
    pub images: Option<Vec<String>>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub brand: Option<String>,

    #[validate(range(min = 0, message = "Stock must be >= 0"))]
    pub stock: Option<i64>,

    #[validate(nested)]
    pub features: Option<Vec<ProductFeatureInput>>,
}

impl UpdateProductRequest {
    pub fn into_update(self) -> Result<ProductUpdate, ApiError> {
        Ok(ProductUpdate {
            name: self.name.map(|n| n.trim().to_string()),
            price: self.price,
            description: self.description.map(|d| d.trim().to_string()),
            images: self
                .images
                .map(|images| images.into_iter().map(|i| i.trim().to_string()).collect()),
            category: self.category.as_deref().map(parse_category).transpose()?,
            brand: self.brand.map(|b| b.trim().to_string()),
            stock: self.stock,
            features: self
                .features
                .map(|features| features.into_iter().map(Into::into).collect()),
        })
    }
}

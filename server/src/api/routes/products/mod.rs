//! Product API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::auth::AdminUser;
use crate::api::extractors::{IdPath, QueryPairs, ValidatedJson};
use crate::api::routes::reviews::types::ReviewDto;
use crate::api::types::{ApiError, PaginatedResponse};
use crate::core::CatalogConfig;
use crate::data::TransactionalService;
use crate::data::filters::ProductQuery;

use types::{
    AdminProductsResponse, CreateProductRequest, ProductDetailResponse, ProductDto,
    UpdateProductRequest,
};

/// Shared state for Products API endpoints
#[derive(Clone)]
pub struct ProductsApiState {
    pub database: Arc<TransactionalService>,
    pub catalog: CatalogConfig,
}

/// Build public catalog routes
pub fn routes(database: Arc<TransactionalService>, catalog: CatalogConfig) -> Router<()> {
    let state = ProductsApiState { database, catalog };

    Router::new()
        .route("/products", get(list_products))
        .route("/product/{id}", get(get_product))
        .with_state(state)
}

/// Build admin product routes (auth middleware applied by the server)
pub fn admin_routes(database: Arc<TransactionalService>, catalog: CatalogConfig) -> Router<()> {
    let state = ProductsApiState { database, catalog };

    Router::new()
        .route("/admin/products", get(list_all_products))
        .route("/admin/product/new", post(create_product))
        .route(
            "/admin/product/{id}",
            delete(delete_product).put(update_product),
        )
        .with_state(state)
}

fn product_not_found(id: &str) -> ApiError {
    ApiError::not_found("PRODUCT_NOT_FOUND", format!("Product not found: {}", id))
}

/// Search, filter and paginate the catalog
///
/// `keyword` matches product names (case-insensitive substring). Other keys
/// filter by field: `name`, `description`, `category` and `brand` by exact
/// value; `price`, `ratings`, `stock` and `num_of_reviews` also accept
/// `field[gt|gte|lt|lte]`.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(
        ("keyword" = Option<String>, Query, description = "Name substring"),
        ("page" = Option<u64>, Query, description = "Page number (defaults to 1)"),
        ("limit" = Option<u32>, Query, description = "Page size override"),
        ("category" = Option<String>, Query, description = "phones | gadgets | accessories | other"),
        ("price[gte]" = Option<f64>, Query, description = "Minimum price")
    ),
    responses(
        (status = 200, description = "Matching products with pagination metadata"),
        (status = 400, description = "Invalid filter"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn list_products(
    State(state): State<ProductsApiState>,
    QueryPairs(params): QueryPairs,
) -> Result<Json<PaginatedResponse<ProductDto>>, ApiError> {
    let query = ProductQuery::new(params);
    let page_size = state.catalog.resolve_page_size(query.param("limit"));
    let query = query.search().filter()?.paginate(page_size);

    let (products, total) = state
        .database
        .repository()
        .list_products(&query)
        .await
        .map_err(ApiError::from_data)?;

    let page = query.window().map_or(1, |w| w.page);
    let data = products.into_iter().map(ProductDto::from).collect();

    Ok(Json(PaginatedResponse::new(data, page, page_size, total)))
}

/// Get a product with its reviews
#[utoipa::path(
    get,
    path = "/api/v1/product/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetailResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductsApiState>,
    IdPath(id): IdPath,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let repo = state.database.repository();

    let product = repo
        .get_product(&id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| product_not_found(&id))?;

    let reviews = repo.list_reviews(&id).await.map_err(ApiError::from_data)?;

    Ok(Json(ProductDetailResponse {
        product: product.into(),
        reviews: reviews.into_iter().map(ReviewDto::from).collect(),
    }))
}

/// List all products (admin)
#[utoipa::path(
    get,
    path = "/api/v1/admin/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = AdminProductsResponse),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_all_products(
    State(state): State<ProductsApiState>,
    _admin: AdminUser,
) -> Result<Json<AdminProductsResponse>, ApiError> {
    let products = state
        .database
        .repository()
        .list_all_products()
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(AdminProductsResponse {
        count: products.len(),
        data: products.into_iter().map(ProductDto::from).collect(),
    }))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/api/v1/admin/product/new",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_product(
    State(state): State<ProductsApiState>,
    admin: AdminUser,
    ValidatedJson(body): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let input = body.into_new_product(admin.ctx.user_id())?;

    let product = state
        .database
        .repository()
        .create_product(&input)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Update a product (admin)
#[utoipa::path(
    put,
    path = "/api/v1/admin/product/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<ProductsApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    let update = body.into_update()?;
    if update.is_empty() {
        return Err(ApiError::bad_request(
            "EMPTY_UPDATE",
            "At least one field must be provided",
        ));
    }

    let product = state
        .database
        .repository()
        .update_product(&id, &update)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| product_not_found(&id))?;

    Ok(Json(product.into()))
}

/// Delete a product and its reviews (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/admin/product/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<ProductsApiState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .database
        .repository()
        .delete_product(&id)
        .await
        .map_err(ApiError::from_data)?;

    if !deleted {
        return Err(product_not_found(&id));
    }

    tracing::debug!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::auth::Role;
    use crate::api::testing::TestApp;

    fn product_body(name: &str, price: f64, category: &str) -> serde_json::Value {
        json!({
            "name": name,
            "price": price,
            "description": "desc",
            "images": ["https://img.example.com/x.png"],
            "category": category,
            "brand": "Acme",
            "stock": 3
        })
    }

    #[tokio::test]
    async fn test_listing_filters_and_paginates() {
        let app = TestApp::new().await;
        for (name, price) in [("super phone X", 300.0), ("cheap phone", 50.0), ("Tablet", 120.0)] {
            app.create_product(product_body(name, price, "phones")).await;
        }

        let (status, body) = app
            .get("/api/v1/products?keyword=Phone&price%5Bgte%5D=100&price%5Blte%5D=500", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total_items"], 1);
        assert_eq!(body["data"][0]["name"], "super phone X");

        let (_, body) = app.get("/api/v1/products?limit=2&page=2", None).await;
        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["meta"]["limit"], 2);
        assert_eq!(body["meta"]["total_items"], 3);
        assert_eq!(body["meta"]["total_pages"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_defaults_and_empty_page() {
        let app = TestApp::new().await;
        app.create_product(product_body("only", 1.0, "other")).await;

        let (status, body) = app.get("/api/v1/products?page=abc&limit=0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["page"], 1);
        assert_eq!(body["meta"]["limit"], 8);

        let (status, body) = app.get("/api/v1/products?page=50", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["meta"]["total_items"], 1);

        let (status, body) = app
            .get("/api/v1/products?page=18446744073709551616", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["meta"]["page"], u64::MAX);
    }

    #[tokio::test]
    async fn test_listing_unicode_keyword_and_name_filter() {
        let app = TestApp::new().await;
        app.create_product(product_body("ÉCRAN Pro", 300.0, "gadgets")).await;
        app.create_product(product_body("Pixel", 500.0, "phones")).await;

        let (status, body) = app
            .get("/api/v1/products?keyword=%C3%A9cran", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total_items"], 1);
        assert_eq!(body["data"][0]["name"], "ÉCRAN Pro");

        let (status, body) = app.get("/api/v1/products?name=Pixel", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total_items"], 1);
        assert_eq!(body["data"][0]["name"], "Pixel");
    }

    #[tokio::test]
    async fn test_listing_rejects_bad_filters() {
        let app = TestApp::new().await;
        for (query, code) in [
            ("price%5Bgte%5D=cheap", "INVALID_FILTER_VALUE"),
            ("category=laptops", "INVALID_CATEGORY"),
            ("color=red", "INVALID_FILTER_FIELD"),
            ("price%5Bne%5D=3", "INVALID_FILTER_OPERATOR"),
        ] {
            let (status, body) = app.get(&format!("/api/v1/products?{}", query), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
            assert_eq!(body["code"], code, "{}", query);
        }
    }

    #[tokio::test]
    async fn test_get_product_with_reviews() {
        let app = TestApp::new().await;
        let product = app.create_product(product_body("Pixel", 500.0, "phones")).await;
        let id = product["id"].as_str().unwrap();

        let (status, body) = app.get(&format!("/api/v1/product/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["name"], "Pixel");
        assert_eq!(body["product"]["ratings"], 0.0);
        assert!(body["reviews"].as_array().unwrap().is_empty());

        let (status, body) = app.get("/api/v1/product/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin() {
        let app = TestApp::new().await;
        let body = product_body("Pixel", 500.0, "phones");

        let (status, resp) = app.post("/api/v1/admin/product/new", None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp["code"], "AUTH_REQUIRED");

        let user = app.token("u1", Role::User).await;
        let (status, resp) = app
            .post("/api/v1/admin/product/new", Some(&user), body)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(resp["code"], "ADMIN_REQUIRED");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let app = TestApp::new().await;
        let admin = app.token("a1", Role::Admin).await;
        let (status, body) = app
            .post(
                "/api/v1/admin/product/new",
                Some(&admin),
                product_body("Pixel", 500.0, "laptops"),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let app = TestApp::new().await;
        let admin = app.token("a1", Role::Admin).await;
        let product = app.create_product(product_body("Pixel", 500.0, "phones")).await;
        let path = format!("/api/v1/admin/product/{}", product["id"].as_str().unwrap());

        let (status, body) = app.put(&path, Some(&admin), json!({"price": 450.0})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 450.0);
        assert_eq!(body["name"], "Pixel");

        let (status, body) = app.put(&path, Some(&admin), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "EMPTY_UPDATE");

        let (status, _) = app.delete(&path, Some(&admin)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.delete(&path, Some(&admin)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .put("/api/v1/admin/product/missing", Some(&admin), json!({"stock": 1}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_listing() {
        let app = TestApp::new().await;
        let admin = app.token("a1", Role::Admin).await;
        app.create_product(product_body("a", 1.0, "other")).await;
        app.create_product(product_body("b", 2.0, "other")).await;

        let (status, body) = app.get("/api/v1/admin/products", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }
}

//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, orders, products, reviews, users};
use crate::api::types::PaginationMeta;
use crate::data::types::{
    OrderItem, OrderStatus, PaymentInfo, ProductCategory, ProductFeature, RatingSummary, Role,
    ShippingInfo,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Product catalog, reviews, orders and user accounts"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "products", description = "Catalog browsing and product management"),
        (name = "reviews", description = "Product reviews"),
        (name = "orders", description = "Order placement and fulfilment"),
        (name = "users", description = "Profiles and account administration")
    ),
    paths(
        // Health
        health::health,
        // Products
        products::list_products,
        products::get_product,
        products::list_all_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        // Reviews
        reviews::upsert_review,
        reviews::list_reviews,
        reviews::delete_review,
        // Orders
        orders::create_order,
        orders::get_order,
        orders::my_orders,
        orders::list_orders,
        orders::update_order_status,
        orders::delete_order,
        // Users
        users::get_profile,
        users::update_profile,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
    ),
    components(schemas(
        // API types
        PaginationMeta,
        // Health
        health::HealthResponse,
        // Products
        ProductCategory,
        ProductFeature,
        products::types::ProductDto,
        products::types::ProductDetailResponse,
        products::types::AdminProductsResponse,
        products::types::ProductFeatureInput,
        products::types::CreateProductRequest,
        products::types::UpdateProductRequest,
        // Reviews
        RatingSummary,
        reviews::types::ReviewDto,
        reviews::types::ReviewsResponse,
        reviews::types::UpsertReviewRequest,
        // Orders
        OrderStatus,
        OrderItem,
        ShippingInfo,
        PaymentInfo,
        orders::types::OrderDto,
        orders::types::MyOrdersResponse,
        orders::types::AdminOrdersResponse,
        orders::types::OrderItemInput,
        orders::types::ShippingInfoInput,
        orders::types::PaymentInfoInput,
        orders::types::CreateOrderRequest,
        orders::types::UpdateOrderStatusRequest,
        // Users
        Role,
        users::types::UserDto,
        users::types::UsersResponse,
        users::types::UpdateProfileRequest,
        users::types::AdminUpdateUserRequest,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Storefront API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;

//! In-process API harness for route tests

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use super::auth::{AuthManager, Role};
use super::middleware::AllowedOrigins;
use super::server::build_router;
use crate::core::{AuthConfig, CatalogConfig};
use crate::data::TransactionalService;
use crate::data::sqlite::SqliteService;
use crate::data::types::NewUser;

const TEST_SECRET: &str = "storefront-test-secret-0123456789";

pub(crate) fn sample_product(name: &str, price: f64) -> Value {
    serde_json::json!({
        "name": name,
        "price": price,
        "description": "A product",
        "images": ["https://img.example.com/1.png"],
        "category": "phones",
        "brand": "Acme",
        "stock": 10
    })
}

pub(crate) struct TestApp {
    router: Router,
    auth: Arc<AuthManager>,
    database: Arc<TransactionalService>,
}

impl TestApp {
    pub(crate) async fn new() -> Self {
        let sqlite = SqliteService::open_in_memory().await.unwrap();
        let database = Arc::new(TransactionalService::from_sqlite(Arc::new(sqlite)));
        let auth = Arc::new(AuthManager::init(&AuthConfig {
            enabled: true,
            jwt_secret: Some(TEST_SECRET.to_string()),
            token_ttl_hours: 1,
        }));
        let router = build_router(
            database.clone(),
            auth.clone(),
            CatalogConfig::default(),
            &AllowedOrigins::new("127.0.0.1", 5380),
        );
        Self {
            router,
            auth,
            database,
        }
    }

    /// Register `user_id` with `role` and return a token for it
    pub(crate) async fn token(&self, user_id: &str, role: Role) -> String {
        self.database
            .repository()
            .upsert_user(&NewUser {
                id: user_id.to_string(),
                name: user_id.to_string(),
                email: None,
                role,
            })
            .await
            .unwrap();
        self.auth.issue_token(user_id, user_id, role).unwrap()
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub(crate) async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub(crate) async fn put(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Create a product as an admin and return its JSON
    pub(crate) async fn create_product(&self, body: Value) -> Value {
        let admin = self.token("admin", Role::Admin).await;
        let (status, product) = self
            .post("/api/v1/admin/product/new", Some(&admin), body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", product);
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_token_errors() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/v1/orders/me", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_INVALID");

        let expired = crate::api::auth::jwt::tests::expired_token(TEST_SECRET.as_bytes(), "u1");
        let (status, body) = app.get("/api/v1/orders/me", Some(&expired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn test_valid_token_without_user_row_is_rejected() {
        let app = TestApp::new().await;
        let token = app.auth.issue_token("ghost", "Ghost", Role::Admin).unwrap();
        let (status, body) = app.get("/api/v1/orders/me", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_required() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/api/v1/orders/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn test_public_routes_need_no_token() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/api/v1/products", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

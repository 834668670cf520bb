//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, orders, products, reviews, users};
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::core::{CatalogConfig, CoreApp};
use crate::data::TransactionalService;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);

        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let router = build_router(
            app.database.clone(),
            app.auth.clone(),
            app.config.catalog.clone(),
            &allowed_origins,
        );

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, "Storefront API listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Build the full application router
///
/// Public catalog routes and authenticated routes share the `/api/v1`
/// prefix; only the latter pass through `require_auth`.
pub fn build_router(
    database: Arc<TransactionalService>,
    auth_manager: Arc<AuthManager>,
    catalog: CatalogConfig,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let public_routes = products::routes(database.clone(), catalog.clone());

    let auth_state = AuthState {
        auth_manager,
        database: database.clone(),
    };

    let protected_routes = Router::new()
        .merge(products::admin_routes(database.clone(), catalog))
        .merge(reviews::routes(database.clone()))
        .merge(orders::routes(database.clone()))
        .merge(users::routes(database))
        .layer(axum::middleware::from_fn_with_state(auth_state, require_auth));

    let api_routes = Router::new()
        .route("/health", get(health::health))
        .merge(public_routes)
        .merge(protected_routes);

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1", api_routes)
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

//! HTTP middleware (CORS, 404 handler)

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::types::ApiError;
use crate::core::config::is_all_interfaces;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        // Loopback and wildcard binds are reachable as both localhost and 127.0.0.1
        let base_hosts: Vec<&str> =
            if is_all_interfaces(host) || host == "127.0.0.1" || host == "localhost" {
                vec!["localhost", "127.0.0.1"]
            } else {
                vec![host]
            };

        let mut origins = Vec::new();
        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}", h));
        }

        Self { origins }
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    /// Get origins as HeaderValues for CORS
    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
}

const MAX_404_BODY_LOG: usize = 64 * 1024; // 64KB limit for logging

/// Handle 404 Not Found with debug logging of the request
pub async fn handle_404(req: Request) -> ApiError {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let not_found = || ApiError::not_found("ROUTE_NOT_FOUND", format!("No route for {} {}", method, uri.path()));

    if !tracing::enabled!(tracing::Level::DEBUG) {
        return not_found();
    }

    match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
        Ok(body) if body.is_empty() => tracing::debug!("[404] {} {}", method, uri),
        Ok(body) => tracing::debug!(
            "[404] {} {} body={}",
            method,
            uri,
            String::from_utf8_lossy(&body)
        ),
        Err(_) => tracing::debug!("[404] {} {} (failed to read body)", method, uri),
    }

    not_found()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_allows_both_aliases() {
        let allowed = AllowedOrigins::new("127.0.0.1", 5380);
        assert!(allowed.is_allowed("http://localhost:5380"));
        assert!(allowed.is_allowed("http://127.0.0.1:5380"));
        assert!(!allowed.is_allowed("http://evil.example:5380"));
    }

    #[test]
    fn test_all_interfaces_allows_loopback() {
        let allowed = AllowedOrigins::new("0.0.0.0", 8080);
        assert!(allowed.is_allowed("http://localhost:8080"));
    }

    #[test]
    fn test_custom_host() {
        let allowed = AllowedOrigins::new("shop.internal", 80);
        assert!(allowed.is_allowed("http://shop.internal:80"));
        assert!(allowed.is_allowed("http://shop.internal"));
        assert!(!allowed.is_allowed("http://localhost:80"));
    }
}

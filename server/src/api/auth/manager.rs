//! Authentication manager

use anyhow::Result;

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::AuthConfig;
use crate::data::types::Role;
use crate::core::constants::ENV_JWT_SECRET;
use crate::utils::crypto;

/// Main authentication manager
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    token_ttl_hours: u32,
    enabled: bool,
}

impl AuthManager {
    /// Initialize the authentication manager
    ///
    /// Without a configured secret a random per-process key is used, so
    /// tokens do not survive a restart.
    pub fn init(config: &AuthConfig) -> Self {
        let signing_key = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                if config.enabled {
                    tracing::warn!(
                        "No JWT secret configured; using a random key. Set {} to keep tokens valid across restarts",
                        ENV_JWT_SECRET
                    );
                }
                crypto::generate_token(32).into_bytes()
            }
        };

        if config.enabled {
            tracing::debug!("Authentication enabled");
        } else {
            tracing::warn!("Authentication DISABLED: every request acts as the local admin");
        }

        Self {
            signing_key,
            token_ttl_hours: config.token_ttl_hours,
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Issue a signed session token
    pub fn issue_token(&self, user_id: &str, name: &str, role: Role) -> Result<String> {
        create_session_token(&self.signing_key, user_id, name, role, self.token_ttl_hours)
    }

    /// Validate a JWT session token
    pub fn validate_session(&self, jwt: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(jwt, &self.signing_key)
    }
}

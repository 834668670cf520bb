//! Authentication module

mod context;
mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use crate::data::types::Role;
pub use context::AuthContext;
pub use extractors::{AdminUser, AuthRejection, AuthUser};
pub use jwt::SessionClaims;
pub use manager::AuthManager;
pub use middleware::{AuthError, AuthState, require_auth};

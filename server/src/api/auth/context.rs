//! Authentication context
//!
//! Inserted into request extensions by `require_auth` and read by the
//! auth extractors.

use crate::api::types::ApiError;
use crate::core::constants::{DEFAULT_USER_ID, DEFAULT_USER_NAME};
use crate::data::types::{Role, UserRow};

/// Authenticated caller
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Token holder resolved to a stored user
    Session {
        user_id: String,
        name: String,
        role: Role,
    },
    /// Default local admin (--no-auth mode)
    LocalDefault,
}

impl AuthContext {
    /// Name and role come from the stored row, not the token
    pub fn from_user(user: UserRow) -> Self {
        Self::Session {
            user_id: user.id,
            name: user.name,
            role: user.role,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Session { user_id, .. } => user_id,
            Self::LocalDefault => DEFAULT_USER_ID,
        }
    }

    /// Display name to record on reviews
    pub fn display_name(&self) -> &str {
        match self {
            Self::Session { name, .. } => name,
            Self::LocalDefault => DEFAULT_USER_NAME,
        }
    }

    pub fn is_admin(&self) -> bool {
        match self {
            Self::Session { role, .. } => *role == Role::Admin,
            Self::LocalDefault => true,
        }
    }

    /// Allow access to a resource owned by `owner_id` (owner or admin)
    pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<(), ApiError> {
        if self.is_admin() || self.user_id() == owner_id {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "ACCESS_DENIED",
                "You do not have access to this resource",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: Role) -> AuthContext {
        AuthContext::Session {
            user_id: id.to_string(),
            name: "Ann".to_string(),
            role,
        }
    }

    #[test]
    fn test_local_default_is_admin() {
        let ctx = AuthContext::LocalDefault;
        assert!(ctx.is_admin());
        assert_eq!(ctx.user_id(), DEFAULT_USER_ID);
        assert_eq!(ctx.display_name(), DEFAULT_USER_NAME);
    }

    #[test]
    fn test_from_user_uses_stored_role() {
        let ctx = AuthContext::from_user(UserRow {
            id: "u1".to_string(),
            name: "Ann".to_string(),
            email: None,
            role: Role::Admin,
            created_at: 0,
            updated_at: 0,
        });
        assert!(ctx.is_admin());
        assert_eq!(ctx.user_id(), "u1");
        assert_eq!(ctx.display_name(), "Ann");
    }

    #[test]
    fn test_owner_or_admin() {
        assert!(user("u1", Role::User).require_owner_or_admin("u1").is_ok());
        assert!(user("u2", Role::User).require_owner_or_admin("u1").is_err());
        assert!(user("a1", Role::Admin).require_owner_or_admin("u1").is_ok());
    }
}

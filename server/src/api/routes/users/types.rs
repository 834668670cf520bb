//! User API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::validate_not_blank;
use crate::core::constants::MAX_USER_NAME_LEN;
use crate::data::types::{Role, UserRow, UserUpdate};

/// User DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// All users (admin)
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub count: usize,
    pub users: Vec<UserDto>,
}

/// Caller's own profile changes; the role is not self-service
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_USER_NAME_LEN, message = "Name cannot exceed 50 characters")
    )]
    pub name: Option<String>,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

impl From<UpdateProfileRequest> for UserUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email.map(|e| e.trim().to_lowercase()),
            role: None,
        }
    }
}

/// Admin changes to any account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminUpdateUserRequest {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = MAX_USER_NAME_LEN, message = "Name cannot exceed 50 characters")
    )]
    pub name: Option<String>,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,

    pub role: Option<Role>,
}

impl From<AdminUpdateUserRequest> for UserUpdate {
    fn from(req: AdminUpdateUserRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email.map(|e| e.trim().to_lowercase()),
            role: req.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_validation() {
        let req: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({"name": " Ann ", "email": "Ann@Example.com"}))
                .unwrap();
        assert!(req.validate().is_ok());
        let update = UserUpdate::from(req);
        assert_eq!(update.name.as_deref(), Some("Ann"));
        assert_eq!(update.email.as_deref(), Some("ann@example.com"));
        assert_eq!(update.role, None);

        let req: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({"email": "not-an-email"})).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({"name": "x".repeat(51)})).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_profile_update_cannot_carry_role() {
        let result = serde_json::from_value::<UpdateProfileRequest>(
            serde_json::json!({"role": "admin"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_admin_update_parses_role() {
        let req: AdminUpdateUserRequest =
            serde_json::from_value(serde_json::json!({"role": "admin"})).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(UserUpdate::from(req).role, Some(Role::Admin));

        assert!(
            serde_json::from_value::<AdminUpdateUserRequest>(
                serde_json::json!({"role": "owner"})
            )
            .is_err()
        );
    }
}

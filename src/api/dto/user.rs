//! User-related DTOs for API requests and responses.

use crate::models::{NewUser, User, UserChanges};
use crate::utils::validate::{validate_email_format, validate_field_length, validate_not_blank};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating or replacing a user. Both fields are required
/// and hold at most 255 characters.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UserRequest {
    #[serde(default)]
    #[validate(
        required,
        custom(function = "validate_not_blank"),
        custom(function = "validate_field_length")
    )]
    #[schema(value_type = String, max_length = 255, example = "Ana")]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(
        required,
        custom(function = "validate_not_blank"),
        custom(function = "validate_email_format"),
        custom(function = "validate_field_length")
    )]
    #[schema(value_type = String, format = "email", max_length = 255, example = "ana@example.com")]
    pub email: Option<String>,
}

impl UserRequest {
    fn into_parts(self) -> (String, String) {
        (
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
        )
    }

    /// Converts a validated request into a row for insertion.
    pub fn into_new_user(self) -> NewUser {
        let (name, email) = self.into_parts();
        NewUser { name, email }
    }

    /// Converts a validated request into a full replacement of the user fields.
    pub fn into_changes(self) -> UserChanges {
        let (name, email) = self.into_parts();
        UserChanges { name, email }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// A stored user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at.strftime(TIMESTAMP_FORMAT).to_string(),
            updated_at: user.updated_at.strftime(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Echo of a freshly created user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedUserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl CreatedUserResponse {
    pub fn new(id: i32, user: NewUser) -> Self {
        Self {
            id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use jiff::tz::TimeZone;

    #[test]
    fn test_user_response_timestamps() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            created_at: "2024-03-01T09:30:00Z".parse().unwrap(),
            updated_at: "2024-03-02T10:00:05.25Z".parse().unwrap(),
        };

        let response = UserResponse::from(user);
        assert_eq!(response.created_at, "2024-03-01T09:30:00.000Z");
        assert_eq!(response.updated_at, "2024-03-02T10:00:05.250Z");
    }

    #[test]
    fn test_user_response_is_rendered_in_utc() {
        // 12:00 in a UTC-3 zone is 15:00 UTC
        let created_at: Timestamp = jiff::civil::date(2024, 3, 1)
            .at(12, 0, 0, 0)
            .to_zoned(TimeZone::fixed(jiff::tz::offset(-3)))
            .unwrap()
            .timestamp();
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            created_at,
            updated_at: created_at,
        };

        assert_eq!(
            UserResponse::from(user).created_at,
            "2024-03-01T15:00:00.000Z"
        );
    }

    #[test]
    fn test_request_conversion() {
        let request = UserRequest {
            name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
        };
        let changes = request.into_changes();
        assert_eq!(changes.name, "Ana");
        assert_eq!(changes.email, "ana@example.com");
    }
}

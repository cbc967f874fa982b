use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful response carrying a payload.
///
/// `count` is only present on list responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// Response without a payload: successful updates and deletes, and every error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    /// Underlying error text, only when error details are exposed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_only_when_set() {
        let body = serde_json::to_value(ApiResponse::ok("done", vec![1, 2])).unwrap();
        assert!(body.get("count").is_none());

        let body = serde_json::to_value(ApiResponse::ok("done", vec![1, 2]).with_count(2)).unwrap();
        assert_eq!(body["count"], json!(2));
    }

    #[test]
    fn test_failure_omits_error() {
        let body = serde_json::to_value(MessageResponse::failure("User not found")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "User not found" }));
    }
}

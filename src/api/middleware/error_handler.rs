//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as the `{ success: false, message }` envelope and
//! records the internal error text in an [`ErrorDetail`] extension. The
//! envelope middleware decides whether that text reaches the client and turns
//! framework-generated plain-text errors into the same envelope.

use std::any::Any;

use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::MessageResponse;
use crate::config::ApiOptions;
use crate::error::AppError;

/// Internal error text attached to 5xx responses.
#[derive(Clone, Debug)]
pub struct ErrorDetail(pub String);

const GENERIC_SERVER_ERROR: &str = "Internal server error";
const BODY_TOO_LARGE: &str = "Request body too large";

fn server_error_message(operation: &str) -> String {
    format!("Internal server error while trying to {}", operation)
}

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - PayloadTooLarge → 413 PAYLOAD_TOO_LARGE
    /// - Duplicate → 409 CONFLICT
    /// - NotFound → 404 NOT_FOUND
    /// - Database, Configuration, ConnectionPool, Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let message = match &self {
            AppError::Validation { reason, .. } => reason.clone(),
            AppError::BadRequest { message } => format!("Invalid request body: {}", message),
            AppError::PayloadTooLarge { .. } => BODY_TOO_LARGE.to_string(),
            AppError::Duplicate { field, .. } if field == "email" => {
                "Email is already registered".to_string()
            }
            AppError::Duplicate { field, .. } => format!("Duplicate value for {}", field),
            AppError::NotFound { entity, field, .. } if entity == "users" && field == "id" => {
                "User not found".to_string()
            }
            AppError::NotFound { entity, .. } => format!("{} not found", entity),
            AppError::Database { operation, .. } => server_error_message(operation),
            AppError::ConnectionPool { .. } => server_error_message("reach the database"),
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                GENERIC_SERVER_ERROR.to_string()
            }
        };

        let detail = self.detail();
        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut response = (status, Json(MessageResponse::failure(message))).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Response for a handler panic, used by the panic-recovery layer.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    tracing::error!(panic = %detail, "Handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::failure(GENERIC_SERVER_ERROR)),
    )
        .into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

fn fallback_message(status: StatusCode, original: &str) -> String {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => BODY_TOO_LARGE.to_string(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported media type".to_string(),
        _ if status.is_server_error() => GENERIC_SERVER_ERROR.to_string(),
        _ if original.is_empty() => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
        _ => original.to_string(),
    }
}

/// Error envelope middleware.
///
/// - Non-JSON 4xx/5xx bodies produced outside the handlers are rewritten into
///   `{ success: false, message }`.
/// - When `expose_error_details` is on, the [`ErrorDetail`] of a response is
///   added to the body as `error`.
pub async fn error_envelope_middleware(
    State(options): State<ApiOptions>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let detail = response.extensions().get::<ErrorDetail>().cloned();

    if is_json(&response) {
        return match detail {
            Some(ErrorDetail(detail)) if options.expose_error_details => {
                attach_detail(response, detail).await
            }
            _ => response,
        };
    }

    let (mut parts, body) = response.into_parts();
    let original = axum::body::to_bytes(body, usize::MAX)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let mut envelope = MessageResponse::failure(fallback_message(status, &original));
    if options.expose_error_details {
        envelope.error = detail.map(|d| d.0).or_else(|| {
            (!original.is_empty() && status.is_server_error()).then_some(original)
        });
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (parts, Json(envelope)).into_response()
}

async fn attach_detail(response: Response, detail: String) -> Response {
    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.insert("error".to_string(), serde_json::Value::String(detail));
            parts.headers.remove(header::CONTENT_LENGTH);
            (parts, Json(serde_json::Value::Object(map))).into_response()
        }
        _ => Response::from_parts(parts, Body::from(bytes)),
    }
}

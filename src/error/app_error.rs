use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;
use crate::utils::validate::{MISSING_CODES, MISSING_FIELDS_MESSAGE};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use diesel_async::pooled_connection::PoolError;
use thiserror::Error;
use validator::ValidationErrors;

/// Application-wide error type that represents all possible errors in the system.
///
/// Every handler returns `AppResult<T>`; the HTTP layer maps each variant to a
/// status code and the `{ success, message, error? }` envelope.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Request body above the configured size limit
    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for a missing user row.
    pub fn user_not_found(id: i32) -> Self {
        AppError::NotFound {
            entity: "users".to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    /// Shorthand for an email that already belongs to another user.
    pub fn email_taken(email: &str) -> Self {
        AppError::Duplicate {
            entity: "users".to_string(),
            field: "email".to_string(),
            value: email.to_string(),
        }
    }

    /// Whether the error is caused by the server rather than the request.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AppError::Database { .. }
                | AppError::Configuration { .. }
                | AppError::ConnectionPool { .. }
                | AppError::Internal { .. }
        )
    }

    /// Full error chain of server-side failures, used as the optional `error` detail.
    pub fn detail(&self) -> Option<String> {
        match self {
            AppError::Database { source, .. }
            | AppError::Configuration { source, .. }
            | AppError::ConnectionPool { source }
            | AppError::Internal { source } => Some(format!("{:#}", source)),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::msg(error.to_string()),
        }
    }
}

/// Bodies cut off by the size limit keep their 413; any other rejection is a 400.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { message }
        } else {
            AppError::BadRequest { message }
        }
    }
}

/// Collapses field errors into a single `Validation` error.
///
/// Missing fields are reported before format errors; fields are visited in
/// name order so the outcome does not depend on map iteration.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<(String, String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                let field = field.to_string();
                list.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field));
                    (field.clone(), error.code.to_string(), message)
                })
            })
            .collect();
        field_errors.sort();

        let missing = field_errors
            .iter()
            .find(|(_, code, _)| MISSING_CODES.contains(&code.as_str()))
            .map(|(field, _, _)| (field.clone(), MISSING_FIELDS_MESSAGE.to_string()));

        match missing.or_else(|| {
            field_errors
                .into_iter()
                .next()
                .map(|(field, _, message)| (field, message))
        }) {
            Some((field, reason)) => AppError::Validation { field, reason },
            None => AppError::BadRequest {
                message: errors.to_string(),
            },
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

use std::borrow::Cow;
use std::sync::OnceLock;

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Message for a missing or blank `name` / `email`.
pub const MISSING_FIELDS_MESSAGE: &str = "Name and email are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email format";
pub const INVALID_ID_MESSAGE: &str = "Invalid user ID";
pub const FIELD_TOO_LONG_MESSAGE: &str = "Name and email must be at most 255 characters";

/// Width of the `name` and `email` columns.
pub const MAX_FIELD_LENGTH: usize = 255;

/// Validation codes that mean "field absent", reported before any format error.
pub const MISSING_CODES: [&str; 2] = ["required", "blank"];

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("blank", MISSING_FIELDS_MESSAGE));
    }
    Ok(())
}

/// Rejects values longer than the column they are stored in.
pub fn validate_field_length(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(error_with_message("too_long", FIELD_TOO_LONG_MESSAGE));
    }
    Ok(())
}

/// Accepts `local@domain.tld` with no whitespace and a single `@` per part.
///
/// Blank values are left to [`validate_not_blank`].
pub fn validate_email_format(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || email_regex().is_match(value) {
        return Ok(());
    }
    Err(error_with_message("email_format", INVALID_EMAIL_MESSAGE))
}

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Malformed JSON becomes `AppError::BadRequest`; rule violations become
/// `AppError::Validation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// The `{id}` path parameter of the user routes, parsed as a strict integer.
///
/// Runs before the body extractor, so a bad id is reported ahead of body errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i32);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let invalid = || AppError::Validation {
            field: "id".to_string(),
            reason: INVALID_ID_MESSAGE.to_string(),
        };

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        raw.parse::<i32>().map(UserId).map_err(|_| invalid())
    }
}

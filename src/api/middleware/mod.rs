//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking
//! and error envelope rendering.

mod error_handler;
mod logging;
mod request_id;

pub use error_handler::{ErrorDetail, error_envelope_middleware, error_to_status_code, panic_response};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};

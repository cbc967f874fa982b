//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `envelope` - The `{ success, message, ... }` wrapper shared by all user routes
//! - `user` - User-related request/response DTOs
//! - `health` - Health check responses
//! - `meta` - API information and the not-found fallback body

mod envelope;
mod health;
mod meta;
mod user;

pub use envelope::{ApiResponse, MessageResponse};
pub use health::{DatabaseState, HealthResponse};
pub use meta::{ApiInfoResponse, DeprecatedInfoResponse, EndpointsInfo, RouteNotFoundResponse};
pub use user::{CreatedUserResponse, UserRequest, UserResponse};

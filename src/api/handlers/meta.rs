//! API information routes and the not-found fallback.

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
};

use crate::api::dto::{
    ApiInfoResponse, DeprecatedInfoResponse, EndpointsInfo, RouteNotFoundResponse,
};
use crate::state::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Endpoints listed in the not-found response.
pub const AVAILABLE_ENDPOINTS: [&str; 7] = [
    "GET /",
    "GET /health",
    "GET /api/users",
    "POST /api/users",
    "PUT /api/users/:id",
    "DELETE /api/users/:id",
    "GET /api-docs/openapi.json",
];

/// GET / - Application name, version and entry points
pub async fn api_info(State(state): State<AppState>) -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: state.application.name.clone(),
        version: state.application.version.clone(),
        status: "running".to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        endpoints: EndpointsInfo {
            users: "/api/users".to_string(),
            legacy_users: "/users/list".to_string(),
            health: "/health".to_string(),
            docs: OPENAPI_PATH.to_string(),
        },
    })
}

/// GET /pagina2 - Deprecated application information
pub async fn deprecated_info(State(state): State<AppState>) -> Json<DeprecatedInfoResponse> {
    Json(DeprecatedInfoResponse {
        application: state.application.name.clone(),
        version: state.application.version.clone(),
        deprecated: true,
        message: "This route is deprecated. Use / for API information".to_string(),
    })
}

/// Fallback for unmatched routes and unsupported methods.
pub async fn route_not_found(
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> (StatusCode, Json<RouteNotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(RouteNotFoundResponse {
            success: false,
            message: format!("Route {} {} does not exist", method, uri.path()),
            available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }),
    )
}

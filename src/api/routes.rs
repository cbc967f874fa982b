//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Json, Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    limit::RequestBodyLimitLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{self, meta::OPENAPI_PATH};
use crate::api::middleware::{
    error_envelope_middleware, logging_middleware, panic_response, request_id_middleware,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Outermost first:
/// 1. CORS (permissive)
/// 2. Response compression
/// 3. Request ID - generates/propagates request IDs
/// 4. Logging - logs requests with request IDs
/// 5. Error envelope - JSON bodies and optional error details for 4xx/5xx
/// 6. Body limit - rejects bodies above `body_limit` bytes
/// 7. Panic recovery
///
/// # Routes
/// - `/api/users` - User CRUD operations (documented)
/// - `/users/...` - Legacy aliases of the user routes
/// - `/health`, `/health/ready`, `/health/live` - Health checks
/// - `/`, `/pagina2` - API information
/// - `/api-docs/openapi.json` - OpenAPI document
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    let (documented, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/users", handlers::users::user_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    Router::new()
        .merge(documented)
        .merge(handlers::users::legacy_user_routes())
        .route("/", get(handlers::meta::api_info))
        .route("/pagina2", get(handlers::meta::deprecated_info))
        .route(OPENAPI_PATH, get(move || async move { Json(openapi) }))
        .fallback(handlers::meta::route_not_found)
        .method_not_allowed_fallback(handlers::meta::route_not_found)
        // Middleware is applied in reverse order - last added runs first
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn_with_state(
            state.options.clone(),
            error_envelope_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

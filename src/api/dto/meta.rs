use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entry points advertised by `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EndpointsInfo {
    pub users: String,
    pub legacy_users: String,
    pub health: String,
    pub docs: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    pub endpoints: EndpointsInfo,
}

/// Body of the deprecated `GET /pagina2`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeprecatedInfoResponse {
    pub application: String,
    pub version: String,
    pub deprecated: bool,
    pub message: String,
}

/// Body of the not-found fallback.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RouteNotFoundResponse {
    pub success: bool,
    pub message: String,
    pub available_endpoints: Vec<String>,
}

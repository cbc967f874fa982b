use utoipa::OpenApi;

pub const USER_TAG: &str = "User";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Study App API",
        description = "User management API backed by PostgreSQL",
    ),
    components(
        schemas(
            crate::api::dto::MessageResponse,
            crate::api::dto::RouteNotFoundResponse,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

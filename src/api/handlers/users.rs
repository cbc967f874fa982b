//! User CRUD request handlers.
//!
//! Each handler validates its input before touching storage: the path id
//! first, then field presence, then email format.

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ApiResponse, CreatedUserResponse, MessageResponse, UserRequest, UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{UserId, ValidatedJson};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates the documented user routes, nested under `/api/users`.
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(update_user, delete_user))
}

/// Deprecated aliases of the user routes, kept for older clients.
pub fn legacy_user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/list", get(list_users))
        .route("/users/create", post(create_user))
        .route("/users/update/{id}", put(update_user))
        .route("/users/delete/{id}", delete(delete_user))
}

/// GET /api/users - List all users, newest first
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Users retrieved", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = state.services.users.list_users().await?;
    let count = users.len();
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(
        ApiResponse::ok("Users retrieved successfully", data).with_count(count),
    ))
}

/// POST /api/users - Create a new user
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<CreatedUserResponse>),
        (status = 400, description = "Missing fields or invalid email", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedUserResponse>>)> {
    let new_user = payload.into_new_user();
    let id = state.services.users.create_user(new_user.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User created successfully",
            CreatedUserResponse::new(id, new_user),
        )),
    ))
}

/// PUT /api/users/:id - Replace name and email of a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Invalid id, missing fields or invalid email", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 409, description = "Email belongs to another user", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .update_user(id, payload.into_changes())
        .await?;
    Ok(Json(MessageResponse::success("User updated successfully")))
}

/// DELETE /api/users/:id - Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<MessageResponse>> {
    state.services.users.delete_user(id).await?;
    Ok(Json(MessageResponse::success("User deleted successfully")))
}

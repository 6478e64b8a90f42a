use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::kredo::handlers::UserRequest;
use crate::kredo::service::{CredentialError, CredentialService};

#[utoipa::path(
    post,
    path= "/create_user",
    request_body = UserRequest,
    responses (
        (status = 200, description = "User created", content_type = "application/json"),
        (status = 400, description = "User already exists or malformed payload", content_type = "application/json"),
        (status = 500, description = "Credential store unreachable", content_type = "application/json"),
    ),
    tag= "users"
)]
// axum handler for user creation
#[instrument(skip(service, payload))]
pub async fn create_user(
    service: Extension<Arc<CredentialService>>,
    payload: Option<Json<UserRequest>>,
) -> impl IntoResponse {
    let user: UserRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Missing payload" })),
            )
        }
    };

    debug!("user: {:?}", user);

    // presence checks only, no password policy
    if user.username.is_empty() || user.password.expose_secret().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Username and password must be non-empty" })),
        );
    }

    match service.register(&user.username, user.password).await {
        Ok(user_id) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "User created",
                "user_id": user_id,
            })),
        ),
        Err(CredentialError::AlreadyExists) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "User already exists" })),
        ),
        Err(err) => {
            error!("Error creating user: {:?}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal server error" })),
            )
        }
    }
}

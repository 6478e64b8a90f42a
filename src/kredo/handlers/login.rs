use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::kredo::handlers::UserRequest;
use crate::kredo::service::{CredentialError, CredentialService};

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserRequest,
    responses (
        (status = 200, description = "Authentication successful", content_type = "application/json"),
        (status = 400, description = "Malformed payload", content_type = "application/json"),
        (status = 401, description = "Invalid credentials", content_type = "application/json"),
        (status = 500, description = "Credential store unreachable", content_type = "application/json"),
    ),
    tag= "users"
)]
// axum handler for login
#[instrument(skip(service, payload))]
pub async fn login(
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

    if user.username.is_empty() || user.password.expose_secret().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Username and password must be non-empty" })),
        );
    }

    match service.authenticate(&user.username, user.password).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "Authentication successful",
            })),
        ),
        // unknown username and wrong password answer identically
        Err(CredentialError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        ),
        Err(err) => {
            error!("Error authenticating user: {:?}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal server error" })),
            )
        }
    }
}

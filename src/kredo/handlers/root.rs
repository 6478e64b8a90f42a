use axum::response::{IntoResponse, Json};
use serde_json::json;

#[utoipa::path(
    get,
    path= "/",
    responses (
        (status = 200, description = "Service greeting", content_type = "application/json"),
    ),
    tag= "root"
)]
// axum handler for the root greeting
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello, World!" }))
}

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common_services::api::items::interfaces::CategoriesResponse;
use common_services::api::items::service;
use sqlx::SqlitePool;
use tracing::error;

#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    responses(
        (status = 200, description = "Root message")
    )
)]
pub async fn root() -> &'static str {
    "Lost & Found matching service"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "API is healthy and ready to accept traffic", body = String),
        (status = 503, description = "API is not healthy, likely due to a database issue.")
    )
)]
pub async fn health_check(State(pool): State<SqlitePool>) -> Result<&'static str, StatusCode> {
    match sqlx::query("SELECT 1").fetch_one(&pool).await {
        Ok(_) => Ok("OK"),
        Err(e) => {
            error!("Health check failed: database connection error: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// List the item categories.
///
/// Reports and searches must use one of these labels as `item_type`.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Items",
    responses(
        (status = 200, description = "The fixed category list.", body = CategoriesResponse),
    )
)]
pub async fn get_categories() -> Json<CategoriesResponse> {
    Json(service::categories())
}

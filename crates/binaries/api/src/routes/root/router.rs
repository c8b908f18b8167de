use crate::api_state::ApiState;
use crate::root::handlers::{get_categories, health_check, root};
use axum::{Router, routing::get};

pub fn root_public_router() -> Router<ApiState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/categories", get(get_categories))
}

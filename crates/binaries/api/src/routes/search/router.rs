use crate::api_state::ApiState;
use crate::search::handlers::search_lost_handler;
use axum::{Router, routing::post};

pub fn search_public_router() -> Router<ApiState> {
    Router::new().route("/search", post(search_lost_handler))
}

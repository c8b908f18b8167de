use crate::api_state::ApiState;
use crate::items::handlers::{get_item_handler, list_found_items_handler};
use crate::report::handlers::report_found_handler;
use axum::{Router, routing::get};

pub fn items_public_router() -> Router<ApiState> {
    Router::new()
        .route(
            "/items/found",
            get(list_found_items_handler).post(report_found_handler),
        )
        .route("/items/{item_id}", get(get_item_handler))
}

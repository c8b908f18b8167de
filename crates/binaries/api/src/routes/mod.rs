mod api_doc;
pub mod items;
pub mod multipart;
pub mod report;
pub mod root;
pub mod search;

use crate::api_state::ApiState;
use crate::items::router::items_public_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use crate::search::router::search_public_router;
use axum::Router;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

// --- Router Construction ---
pub fn create_router(api_state: ApiState) -> Router {
    Router::new()
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .merge(public_routes())
        .with_state(api_state)
}

fn public_routes() -> Router<ApiState> {
    Router::new()
        .merge(root_public_router())
        .merge(items_public_router())
        .merge(search_public_router())
}

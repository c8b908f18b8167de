use crate::api_state::ApiState;
use crate::multipart::read_item_form;
use axum::Json;
use axum::extract::{Multipart, State};
use common_services::api::search::error::SearchError;
use common_services::api::search::interfaces::{SearchLostRequest, SearchResponse};
use common_services::api::search::service::search_lost;
use tracing::instrument;

/// Search the found items for a lost one.
///
/// Candidates go through description, metadata and image comparison in turn; only those
/// clearing every threshold are returned, best match first. Nothing is stored.
#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body(content = SearchLostRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Ranked matches.", body = SearchResponse),
        (status = 400, description = "A required field is missing or the file type is not allowed."),
        (status = 500, description = "The search failed."),
    )
)]
#[instrument(skip(context, multipart), err(Debug))]
pub async fn search_lost_handler(
    State(context): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, SearchError> {
    let fields = read_item_form(&mut multipart)
        .await
        .map_err(|e| SearchError::BadRequest(e.body_text()))?;
    let response = search_lost(
        &context.pool,
        context.description_oracle.as_ref(),
        &context.engine,
        &context.uploads,
        fields.into(),
    )
    .await?;
    Ok(Json(response))
}

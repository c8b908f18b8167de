use crate::api_state::ApiState;
use crate::multipart::read_item_form;
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use common_services::api::report::error::ReportError;
use common_services::api::report::interfaces::{ReportFoundRequest, ReportFoundResponse};
use common_services::api::report::service::report_found;
use tracing::instrument;

/// Report a found item.
///
/// The photo is stored and described by the AI oracle. When the description fails the item
/// is still saved and the response carries a warning.
#[utoipa::path(
    post,
    path = "/items/found",
    tag = "Items",
    request_body(content = ReportFoundRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Item saved.", body = ReportFoundResponse),
        (status = 400, description = "A required field is missing or the file type is not allowed."),
        (status = 500, description = "The item could not be saved."),
    )
)]
#[instrument(skip(context, multipart), err(Debug))]
pub async fn report_found_handler(
    State(context): State<ApiState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReportFoundResponse>), ReportError> {
    let fields = read_item_form(&mut multipart)
        .await
        .map_err(|e| ReportError::BadRequest(e.body_text()))?;
    let response = report_found(
        &context.pool,
        context.description_oracle.as_ref(),
        &context.uploads,
        context.settings.database.item_id_length,
        fields.into(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

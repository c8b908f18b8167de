use crate::api::forms::ImageUpload;
use common_types::ItemRecord;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A found-item report, as read from the multipart request.
#[derive(Debug, Clone, Default)]
pub struct ReportFoundForm {
    pub item_image: Option<ImageUpload>,
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
}

/// Multipart body of `POST /items/found`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ReportFoundRequest {
    /// Photo of the item (png, jpg, jpeg or gif).
    #[schema(value_type = String, format = Binary)]
    item_image: Vec<u8>,
    /// One of the labels returned by `GET /categories`.
    item_type: String,
    color: Option<String>,
    brand: Option<String>,
    /// Where the item was found.
    location: String,
    contact_info: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReportFoundResponse {
    pub item: ItemRecord,
    /// Non-fatal problems, such as a failed AI description.
    pub warnings: Vec<String>,
}

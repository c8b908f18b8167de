use crate::api::forms::ImageUpload;
use common_types::MatchResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A lost-item search, as read from the multipart request.
#[derive(Debug, Clone, Default)]
pub struct SearchLostForm {
    pub item_image: Option<ImageUpload>,
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
}

/// Multipart body of `POST /search`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct SearchLostRequest {
    /// Photo of the lost item, or of a similar one.
    #[schema(value_type = String, format = Binary)]
    item_image: Vec<u8>,
    item_type: String,
    color: Option<String>,
    brand: Option<String>,
    /// Last known location.
    location: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// AI description of the search image, empty when it could not be generated.
    pub search_description: String,
    pub warnings: Vec<String>,
    /// Best match first.
    pub matches: Vec<MatchResult>,
}

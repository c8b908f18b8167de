use crate::api::forms::{check_image, non_blank, parse_category};
use crate::api::search::error::SearchError;
use crate::api::search::interfaces::{SearchLostForm, SearchResponse};
use crate::database::ItemStore;
use crate::storage::UploadStore;
use common_types::{AttributeSet, QueryItem};
use matching::MatchingEngine;
use oracle::{DescriptionOracle, DescriptionOutcome};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Match a lost item against every found item.
///
/// The search image only lives in a temporary file for the duration of the call; nothing
/// about the search is stored.
pub async fn search_lost(
    pool: &SqlitePool,
    description_oracle: &dyn DescriptionOracle,
    engine: &MatchingEngine,
    uploads: &UploadStore,
    form: SearchLostForm,
) -> Result<SearchResponse, SearchError> {
    let image = check_image(form.item_image.as_ref(), "No image selected for searching.")
        .map_err(SearchError::BadRequest)?;
    let (Some(item_type), Some(location)) = (
        non_blank(form.item_type.as_deref()),
        non_blank(form.location.as_deref()),
    ) else {
        return Err(SearchError::BadRequest(
            "Item Type and Last Known Location are required.".to_string(),
        ));
    };
    let category = parse_category(&item_type).map_err(SearchError::BadRequest)?;
    if !uploads.is_allowed(&image.file_name) {
        return Err(SearchError::BadRequest(format!(
            "Invalid file type for search image. Allowed types: {}",
            uploads.allowed_extensions().join(", ")
        )));
    }

    // Kept out of the served upload folder and removed when dropped, on every return path.
    let staged = uploads.stage_private("search_", &image.file_name, &image.bytes)?;

    let mut warnings = Vec::new();
    let search_description = match description_oracle.describe(&image.bytes).await {
        DescriptionOutcome::Generated(text) => text,
        DescriptionOutcome::Failed(failure) => {
            warn!("AI description failed for search image: {failure}");
            warnings.push(format!(
                "AI description failed: {failure}. Search quality might be affected."
            ));
            String::new()
        }
    };

    let color = non_blank(form.color.as_deref());
    let brand = non_blank(form.brand.as_deref());
    let query = QueryItem {
        attributes: AttributeSet::new(
            category.as_str(),
            color.as_deref(),
            brand.as_deref(),
            &location,
        ),
        description: Some(search_description.clone()).filter(|d| !d.is_empty()),
        image_path: staged.path().to_path_buf(),
    };

    let candidates = ItemStore::list_found(pool).await?;
    info!(
        "Searching {} found items for a lost {}.",
        candidates.len(),
        category
    );
    let matches = engine.find_matches(&query, candidates).await;
    drop(staged);

    Ok(SearchResponse {
        search_description,
        warnings,
        matches,
    })
}

use crate::api::items::error::ItemsError;
use crate::api::items::interfaces::CategoriesResponse;
use crate::database::ItemStore;
use common_types::{ItemCategory, ItemRecord};
use sqlx::SqlitePool;

pub async fn list_found_items(pool: &SqlitePool) -> Result<Vec<ItemRecord>, ItemsError> {
    Ok(ItemStore::list_found(pool).await?)
}

pub async fn get_item(pool: &SqlitePool, item_id: &str) -> Result<ItemRecord, ItemsError> {
    ItemStore::find_by_id(pool, item_id)
        .await?
        .ok_or_else(|| ItemsError::NotFound(item_id.to_string()))
}

/// The categories an item can be reported or searched under, in display order.
#[must_use]
pub fn categories() -> CategoriesResponse {
    CategoriesResponse {
        categories: ItemCategory::ALL.to_vec(),
    }
}

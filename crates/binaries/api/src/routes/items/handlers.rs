use axum::Json;
use axum::extract::{Path, State};
use common_services::api::items::error::ItemsError;
use common_services::api::items::service;
use common_types::ItemRecord;
use sqlx::SqlitePool;

/// List every reported found item, oldest first.
#[utoipa::path(
    get,
    path = "/items/found",
    tag = "Items",
    responses(
        (status = 200, description = "All found items.", body = Vec<ItemRecord>),
        (status = 500, description = "A database error occurred."),
    )
)]
pub async fn list_found_items_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<ItemRecord>>, ItemsError> {
    let items = service::list_found_items(&pool).await?;
    Ok(Json(items))
}

/// Get a single item.
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "Items",
    params(
        ("item_id" = String, Path, description = "The unique ID of the item.")
    ),
    responses(
        (status = 200, description = "The item.", body = ItemRecord),
        (status = 404, description = "No item with this ID."),
        (status = 500, description = "A database error occurred."),
    )
)]
pub async fn get_item_handler(
    State(pool): State<SqlitePool>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemRecord>, ItemsError> {
    let item = service::get_item(&pool, &item_id).await?;
    Ok(Json(item))
}

use crate::database::DbError;
use chrono::Utc;
use common_types::{ItemRecord, ItemStatus, NewItem};
use sqlx::{Executor, Sqlite};

const ITEM_COLUMNS: &str = "id, status, item_type, color, brand, location, image_filename, \
     ai_description, contact_info, created_at";

pub struct ItemStore;

impl ItemStore {
    /// Insert a new item under `item_id`. Run it inside a transaction when the insert must be
    /// undone together with other work.
    pub async fn create(
        executor: impl Executor<'_, Database = Sqlite>,
        item_id: &str,
        item: &NewItem,
    ) -> Result<ItemRecord, DbError> {
        let sql = format!(
            r"
            INSERT INTO item (id, status, item_type, color, brand, location, image_filename,
                              ai_description, contact_info, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ITEM_COLUMNS}
            "
        );
        Ok(sqlx::query_as::<_, ItemRecord>(&sql)
            .bind(item_id)
            .bind(item.status)
            .bind(&item.item_type)
            .bind(&item.color)
            .bind(&item.brand)
            .bind(&item.location)
            .bind(&item.image_filename)
            .bind(&item.ai_description)
            .bind(&item.contact_info)
            .bind(Utc::now())
            .fetch_one(executor)
            .await?)
    }

    /// All items with the given status, oldest first. Ties on `created_at` are broken by id
    /// so the order is stable.
    pub async fn list_by_status(
        executor: impl Executor<'_, Database = Sqlite>,
        status: ItemStatus,
    ) -> Result<Vec<ItemRecord>, DbError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM item WHERE status = $1 ORDER BY created_at, id"
        );
        Ok(sqlx::query_as::<_, ItemRecord>(&sql)
            .bind(status)
            .fetch_all(executor)
            .await?)
    }

    pub async fn list_found(
        executor: impl Executor<'_, Database = Sqlite>,
    ) -> Result<Vec<ItemRecord>, DbError> {
        Self::list_by_status(executor, ItemStatus::Found).await
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Sqlite>,
        item_id: &str,
    ) -> Result<Option<ItemRecord>, DbError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM item WHERE id = $1");
        Ok(sqlx::query_as::<_, ItemRecord>(&sql)
            .bind(item_id)
            .fetch_optional(executor)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn new_item(status: ItemStatus, item_type: &str) -> NewItem {
        NewItem {
            status,
            item_type: item_type.to_string(),
            color: Some("Black".to_string()),
            brand: None,
            location: "Central Station".to_string(),
            image_filename: format!("found_1700000000_{item_type}.jpg"),
            ai_description: Some("A black leather wallet.".to_string()),
            contact_info: "desk@station.example".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() -> color_eyre::Result<()> {
        // ARRANGE
        let pool = memory_pool().await?;
        let item = new_item(ItemStatus::Found, "Keys");

        // ACT
        let created = ItemStore::create(&pool, "abcdef123456", &item).await?;
        let fetched = ItemStore::find_by_id(&pool, "abcdef123456").await?;

        // ASSERT
        assert_eq!(created.id, "abcdef123456");
        assert_eq!(created.status, ItemStatus::Found);
        assert_eq!(created.brand, None);
        assert_eq!(fetched, Some(created));
        assert_eq!(ItemStore::find_by_id(&pool, "missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_found_skips_lost_items_in_stable_order() -> color_eyre::Result<()> {
        let pool = memory_pool().await?;
        for (id, status) in [
            ("item00000001", ItemStatus::Found),
            ("item00000002", ItemStatus::Lost),
            ("item00000003", ItemStatus::Found),
        ] {
            ItemStore::create(&pool, id, &new_item(status, "Keys")).await?;
        }

        let first = ItemStore::list_found(&pool).await?;
        let second = ItemStore::list_found(&pool).await?;

        let ids: Vec<&str> = first.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item00000001", "item00000003"]);
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_rolled_back_insert_leaves_nothing() -> color_eyre::Result<()> {
        let pool = memory_pool().await?;

        let mut tx = pool.begin().await?;
        ItemStore::create(&mut *tx, "rolledback01", &new_item(ItemStatus::Found, "Pet")).await?;
        tx.rollback().await?;

        assert!(ItemStore::list_found(&pool).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_required_field_is_rejected() -> color_eyre::Result<()> {
        let pool = memory_pool().await?;
        let mut item = new_item(ItemStatus::Found, "Keys");
        item.contact_info = String::new();

        let result = ItemStore::create(&pool, "nocontact001", &item).await;

        assert!(result.is_err());
        Ok(())
    }
}

use crate::api::forms::{check_image, non_blank, parse_category};
use crate::api::report::error::ReportError;
use crate::api::report::interfaces::{ReportFoundForm, ReportFoundResponse};
use crate::database::{DbError, ItemStore};
use crate::storage::UploadStore;
use crate::utils::nice_id;
use common_types::{DESCRIPTION_FAILED_SENTINEL, ItemRecord, ItemStatus, NewItem};
use oracle::{DescriptionOracle, DescriptionOutcome};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Store a newly found item: its photo, an AI description of the photo, and the record.
///
/// A failed description does not stop the report; the failure marker is stored and a
/// warning is returned. A failed insert leaves neither a record nor an image behind.
pub async fn report_found(
    pool: &SqlitePool,
    description_oracle: &dyn DescriptionOracle,
    uploads: &UploadStore,
    item_id_length: usize,
    form: ReportFoundForm,
) -> Result<ReportFoundResponse, ReportError> {
    let image = check_image(form.item_image.as_ref(), "No image selected for uploading.")
        .map_err(ReportError::BadRequest)?;
    let (Some(item_type), Some(location), Some(contact_info)) = (
        non_blank(form.item_type.as_deref()),
        non_blank(form.location.as_deref()),
        non_blank(form.contact_info.as_deref()),
    ) else {
        return Err(ReportError::BadRequest(
            "Item Type, Location Found, and Contact Info are required fields.".to_string(),
        ));
    };
    let category = parse_category(&item_type).map_err(ReportError::BadRequest)?;
    if !uploads.is_allowed(&image.file_name) {
        return Err(ReportError::BadRequest(format!(
            "Invalid file type. Allowed types: {}",
            uploads.allowed_extensions().join(", ")
        )));
    }

    let staged = uploads.stage("found_", &image.file_name, &image.bytes)?;

    let mut warnings = Vec::new();
    let ai_description = match description_oracle.describe(&image.bytes).await {
        DescriptionOutcome::Generated(text) => {
            info!("AI description generated for found item.");
            text
        }
        DescriptionOutcome::Failed(failure) => {
            warn!("AI description failed for found item: {failure}");
            warnings.push(format!("AI description failed: {failure}. Item saved."));
            DESCRIPTION_FAILED_SENTINEL.to_string()
        }
    };

    // Deleted again on drop, so an aborted or failed insert leaves no image behind.
    let stored = staged.persist(uploads, "found")?;
    let new_item = NewItem {
        status: ItemStatus::Found,
        item_type: category.as_str().to_string(),
        color: non_blank(form.color.as_deref()),
        brand: non_blank(form.brand.as_deref()),
        location,
        image_filename: stored.file_name().to_string(),
        ai_description: Some(ai_description),
        contact_info,
    };

    let item = insert_item(pool, &nice_id(item_id_length), &new_item)
        .await
        .inspect_err(|e| warn!("Saving found item failed, discarding {}: {e}", stored.file_name()))?;
    stored.keep();
    info!("Found item {} reported ({}).", item.id, item.item_type);
    Ok(ReportFoundResponse { item, warnings })
}

async fn insert_item(
    pool: &SqlitePool,
    item_id: &str,
    item: &NewItem,
) -> Result<ItemRecord, DbError> {
    let mut tx = pool.begin().await?;
    let record = ItemStore::create(&mut *tx, item_id, item).await?;
    tx.commit().await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::forms::ImageUpload;
    use crate::test_support::{FakeOracle, files_in, memory_pool, upload_store};
    use std::time::Duration;

    fn form(file_name: &str) -> ReportFoundForm {
        ReportFoundForm {
            item_image: Some(ImageUpload {
                file_name: file_name.to_string(),
                bytes: b"jpeg bytes".to_vec(),
            }),
            item_type: Some("wallet/purse".to_string()),
            color: Some(" Black ".to_string()),
            brand: Some(String::new()),
            location: Some("Central Station".to_string()),
            contact_info: Some("desk@station.example".to_string()),
        }
    }

    #[tokio::test]
    async fn test_report_found_stores_record_and_image() -> color_eyre::Result<()> {
        // ARRANGE
        let pool = memory_pool().await?;
        let dir = tempfile::tempdir()?;
        let uploads = upload_store(&dir);
        let oracle = FakeOracle::describing("A black leather wallet with a zip.");

        // ACT
        let response = report_found(&pool, &oracle, &uploads, 12, form("wallet.jpg")).await?;

        // ASSERT
        let item = &response.item;
        assert!(response.warnings.is_empty());
        assert_eq!(item.id.len(), 12);
        assert_eq!(item.item_type, "Wallet/Purse");
        assert_eq!(item.color.as_deref(), Some("Black"));
        assert_eq!(item.brand, None);
        assert_eq!(
            item.ai_description.as_deref(),
            Some("A black leather wallet with a zip.")
        );
        assert_eq!(files_in(dir.path())?, vec![item.image_filename.clone()]);
        assert_eq!(ItemStore::list_found(&pool).await?, vec![item.clone()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_description_stores_marker_and_warns() -> color_eyre::Result<()> {
        let pool = memory_pool().await?;
        let dir = tempfile::tempdir()?;
        let uploads = upload_store(&dir);

        let response =
            report_found(&pool, &FakeOracle::failing(), &uploads, 12, form("wallet.png")).await?;

        assert_eq!(
            response.item.ai_description.as_deref(),
            Some(DESCRIPTION_FAILED_SENTINEL)
        );
        assert_eq!(response.item.usable_description(), None);
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].contains("Error: API quota exceeded."));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_reports_are_rejected_before_any_work() -> color_eyre::Result<()> {
        let pool = memory_pool().await?;
        let dir = tempfile::tempdir()?;
        let uploads = upload_store(&dir);
        let oracle = FakeOracle::describing("unused");

        let mut no_contact = form("wallet.jpg");
        no_contact.contact_info = Some("  ".to_string());
        let mut no_image = form("wallet.jpg");
        no_image.item_image = None;
        let mut unknown_type = form("wallet.jpg");
        unknown_type.item_type = Some("Spaceship".to_string());

        for bad in [no_contact, no_image, unknown_type, form("notes.txt")] {
            let result = report_found(&pool, &oracle, &uploads, 12, bad).await;
            assert!(matches!(result, Err(ReportError::BadRequest(_))));
        }
        assert_eq!(oracle.describe_calls(), 0);
        assert!(files_in(dir.path())?.is_empty());
        assert!(ItemStore::list_found(&pool).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_image() -> color_eyre::Result<()> {
        // ARRANGE
        let pool = memory_pool().await?;
        let dir = tempfile::tempdir()?;
        let uploads = upload_store(&dir);
        let oracle = FakeOracle::describing("A black wallet.");
        pool.close().await;

        // ACT
        let result = report_found(&pool, &oracle, &uploads, 12, form("wallet.jpg")).await;

        // ASSERT
        assert!(matches!(result, Err(ReportError::Database(_))));
        assert!(files_in(dir.path())?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_report_leaves_no_image() -> color_eyre::Result<()> {
        // ARRANGE
        let pool = memory_pool().await?;
        let dir = tempfile::tempdir()?;
        let uploads = upload_store(&dir);
        let oracle = FakeOracle::describing("A black wallet.");
        // The pool has a single connection; holding it makes the insert wait.
        let held = pool.acquire().await?;

        // ACT
        let result = tokio::time::timeout(
            Duration::from_millis(200),
            report_found(&pool, &oracle, &uploads, 12, form("wallet.jpg")),
        )
        .await;
        drop(held);

        // ASSERT
        assert!(result.is_err());
        assert_eq!(oracle.describe_calls(), 1);
        assert!(files_in(dir.path())?.is_empty());
        assert!(ItemStore::list_found(&pool).await?.is_empty());
        Ok(())
    }
}

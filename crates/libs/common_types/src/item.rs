use crate::AttributeSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use utoipa::ToSchema;

/// Stored in place of a description when generation failed. Never treated as content.
pub const DESCRIPTION_FAILED_SENTINEL: &str = "AI description generation failed.";

/// Prefix of every description-failure message produced by the description oracle.
pub const DESCRIPTION_ERROR_PREFIX: &str = "Error:";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Found,
    Lost,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corresponds to the 'item' table.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub status: ItemStatus,
    pub item_type: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub location: String,
    pub image_filename: String,
    pub ai_description: Option<String>,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
}

impl ItemRecord {
    /// The stored description, unless it is missing, empty or a failure marker.
    #[must_use]
    pub fn usable_description(&self) -> Option<&str> {
        self.ai_description
            .as_deref()
            .filter(|d| is_usable_description(d))
    }

    /// Where the item's image lives under `root`, if its stored name stays inside `root`.
    #[must_use]
    pub fn image_path(&self, root: &Path) -> Option<PathBuf> {
        resolve_stored_file(root, &self.image_filename)
    }

    /// Lowercased attributes used for metadata comparison.
    #[must_use]
    pub fn metadata(&self) -> AttributeSet {
        AttributeSet::new(
            &self.item_type,
            self.color.as_deref(),
            self.brand.as_deref(),
            &self.location,
        )
    }
}

/// Whether a description is genuine content rather than empty or a failure marker.
#[must_use]
pub fn is_usable_description(description: &str) -> bool {
    let trimmed = description.trim();
    !trimmed.is_empty()
        && trimmed != DESCRIPTION_FAILED_SENTINEL
        && !trimmed.starts_with(DESCRIPTION_ERROR_PREFIX)
}

/// Join a stored file name onto `root`. Empty names, absolute paths and any `..` or `.`
/// component are rejected.
#[must_use]
pub fn resolve_stored_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    let path = Path::new(file_name);
    if file_name.is_empty()
        || !path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(path))
}

/// Everything needed to insert a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub status: ItemStatus,
    pub item_type: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub location: String,
    pub image_filename: String,
    pub ai_description: Option<String>,
    pub contact_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: Option<&str>) -> ItemRecord {
        ItemRecord {
            id: "abc123def456".to_string(),
            status: ItemStatus::Found,
            item_type: "Keys".to_string(),
            color: Some("Silver".to_string()),
            brand: None,
            location: "Main Library".to_string(),
            image_filename: "found_1_keys.jpg".to_string(),
            ai_description: description.map(ToString::to_string),
            contact_info: "desk@library.example".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn image_path_stays_inside_root() {
        let root = Path::new("/srv/uploads");
        let mut item = record(None);
        assert_eq!(
            item.image_path(root),
            Some(PathBuf::from("/srv/uploads/found_1_keys.jpg"))
        );
        for escaping in ["/etc/passwd", "../secret.jpg", "a/../../b.jpg", "./a.jpg", ""] {
            item.image_filename = escaping.to_string();
            assert_eq!(item.image_path(root), None, "{escaping:?}");
        }
    }

    #[test]
    fn failure_markers_are_not_usable() {
        assert_eq!(record(None).usable_description(), None);
        assert_eq!(record(Some("")).usable_description(), None);
        assert_eq!(
            record(Some(DESCRIPTION_FAILED_SENTINEL)).usable_description(),
            None
        );
        assert_eq!(
            record(Some("Error: Gemini API quota exceeded.")).usable_description(),
            None
        );
    }

    #[test]
    fn genuine_description_is_usable() {
        let item = record(Some("A ring of three silver keys."));
        assert_eq!(
            item.usable_description(),
            Some("A ring of three silver keys.")
        );
    }

    #[test]
    fn metadata_is_lowercased() {
        let meta = record(None).metadata();
        assert_eq!(meta.item_type, "keys");
        assert_eq!(meta.color, "silver");
        assert_eq!(meta.brand, "");
        assert_eq!(meta.location, "main library");
    }
}

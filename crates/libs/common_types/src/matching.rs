use crate::ItemRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Structured attributes compared by the metadata tier. All fields are lowercased,
/// an empty string means the attribute is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub item_type: String,
    pub color: String,
    pub brand: String,
    pub location: String,
}

impl AttributeSet {
    #[must_use]
    pub fn new(item_type: &str, color: Option<&str>, brand: Option<&str>, location: &str) -> Self {
        Self {
            item_type: item_type.to_lowercase(),
            color: color.unwrap_or_default().to_lowercase(),
            brand: brand.unwrap_or_default().to_lowercase(),
            location: location.to_lowercase(),
        }
    }
}

/// A lost-item search. Lives for one request only.
#[derive(Debug, Clone)]
pub struct QueryItem {
    pub attributes: AttributeSet,
    /// `None` when describing the query image failed.
    pub description: Option<String>,
    pub image_path: PathBuf,
}

/// Per-tier scores of a candidate. Tiers that never ran stay at 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchScores {
    pub description: f64,
    pub metadata: f64,
    pub image: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub item: ItemRecord,
    pub scores: MatchScores,
}

impl MatchResult {
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.scores.confidence
    }
}

use crate::{DescriptionOutcome, SimilarityOutcome};
use async_trait::async_trait;
use std::path::Path;

/// Turns item photos into text, and compares two texts.
#[async_trait]
pub trait DescriptionOracle: Send + Sync {
    /// Describe the item shown in `image`. Failures come back as
    /// [`DescriptionOutcome::Failed`], never as a panic or error.
    async fn describe(&self, image: &[u8]) -> DescriptionOutcome;

    /// Semantic similarity of two descriptions, in [0, 1].
    async fn text_similarity(&self, a: &str, b: &str) -> SimilarityOutcome;
}

/// Compares two item photos.
#[async_trait]
pub trait VisualOracle: Send + Sync {
    /// Visual similarity of the items in two stored images, in [0, 1].
    /// Missing files degrade to 0.0 without calling the oracle.
    async fn image_similarity(&self, a: &Path, b: &Path) -> SimilarityOutcome;
}

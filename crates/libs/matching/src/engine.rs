use crate::metadata_similarity;
use app_state::{ConfidenceWeights, MatchingSettings};
use common_types::{ItemRecord, MatchResult, MatchScores, QueryItem, is_usable_description};
use futures_util::{StreamExt, stream};
use oracle::{DescriptionOracle, VisualOracle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// A stage of the matching cascade, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Description,
    Metadata,
    Image,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Description => "description",
            Self::Metadata => "metadata",
            Self::Image => "image",
        })
    }
}

/// What the cascade decided for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Matched(MatchResult),
    /// Dropped at `tier`. Scores of later tiers were never computed and stay 0.0.
    Discarded { tier: Tier, scores: MatchScores },
}

/// Final confidence of a candidate that cleared every tier.
#[must_use]
pub fn weighted_confidence(weights: &ConfidenceWeights, scores: &MatchScores) -> f64 {
    weights.description * scores.description
        + weights.metadata * scores.metadata
        + weights.image * scores.image
}

/// Ranks found items against a lost-item query through three tiers: description
/// similarity, metadata similarity, then visual similarity. A candidate leaves the
/// cascade at the first tier it fails, so the expensive image comparison only runs for
/// candidates that already look promising.
pub struct MatchingEngine {
    description_oracle: Arc<dyn DescriptionOracle>,
    visual_oracle: Arc<dyn VisualOracle>,
    settings: MatchingSettings,
    image_root: PathBuf,
}

impl MatchingEngine {
    /// `image_root` is the folder candidate `image_filename`s are resolved against.
    #[must_use]
    pub fn new(
        description_oracle: Arc<dyn DescriptionOracle>,
        visual_oracle: Arc<dyn VisualOracle>,
        settings: MatchingSettings,
        image_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            description_oracle,
            visual_oracle,
            settings,
            image_root: image_root.into(),
        }
    }

    #[must_use]
    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Run the cascade over every candidate and return the survivors, best first.
    ///
    /// Up to `max_concurrency` candidates are in flight at once. Verdicts are gathered in
    /// candidate order and the sort is stable, so ties keep that order.
    pub async fn find_matches(
        &self,
        query: &QueryItem,
        candidates: Vec<ItemRecord>,
    ) -> Vec<MatchResult> {
        let concurrency = self.settings.max_concurrency.max(1);
        info!(
            "Matching query against {} candidates (concurrency {concurrency}).",
            candidates.len()
        );
        let verdicts: Vec<Verdict> = stream::iter(candidates)
            .map(|candidate| self.evaluate(query, candidate))
            .buffered(concurrency)
            .collect()
            .await;

        let mut matches: Vec<MatchResult> = verdicts
            .into_iter()
            .filter_map(|verdict| match verdict {
                Verdict::Matched(result) => Some(result),
                Verdict::Discarded { .. } => None,
            })
            .collect();
        matches.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));
        info!("Found {} matches.", matches.len());
        matches
    }

    /// Run the cascade for a single candidate.
    pub async fn evaluate(&self, query: &QueryItem, candidate: ItemRecord) -> Verdict {
        let settings = &self.settings;
        let mut scores = MatchScores::default();
        debug!(
            "Comparing with found item {} ({})",
            candidate.id, candidate.item_type
        );

        // Tier 1: description. Skipped, not failed, when either side has no description.
        let query_description = query
            .description
            .as_deref()
            .filter(|d| is_usable_description(d));
        match (query_description, candidate.usable_description()) {
            (Some(query_description), Some(candidate_description)) => {
                scores.description = self
                    .description_oracle
                    .text_similarity(query_description, candidate_description)
                    .await
                    .score();
                info!(
                    item = %candidate.id,
                    "Description similarity {:.2} (threshold {})",
                    scores.description, settings.description_threshold
                );
                if scores.description < settings.description_threshold {
                    return discard(&candidate, Tier::Description, scores);
                }
            }
            _ => info!(
                item = %candidate.id,
                "Skipping description comparison (missing/failed)."
            ),
        }

        // Tier 2: metadata.
        scores.metadata = metadata_similarity(&query.attributes, &candidate.metadata());
        info!(
            item = %candidate.id,
            "Metadata similarity {:.2} (threshold {})",
            scores.metadata, settings.metadata_threshold
        );
        if scores.metadata < settings.metadata_threshold {
            return discard(&candidate, Tier::Metadata, scores);
        }

        // Tier 3: image. A missing or unlocatable candidate image leaves the score at 0.0.
        let candidate_image = match candidate.image_path(&self.image_root) {
            Some(path) => fs::try_exists(&path).await.unwrap_or(false).then_some(path),
            None => None,
        };
        if let Some(candidate_image) = candidate_image {
            scores.image = self
                .visual_oracle
                .image_similarity(&query.image_path, &candidate_image)
                .await
                .score();
            info!(
                item = %candidate.id,
                "Image similarity {:.2} (threshold {})",
                scores.image, settings.image_threshold
            );
        } else {
            warn!(
                item = %candidate.id,
                "Skipping image comparison, image {:?} not found in {}",
                candidate.image_filename,
                self.image_root.display()
            );
        }
        if scores.image < settings.image_threshold {
            return discard(&candidate, Tier::Image, scores);
        }

        scores.confidence = weighted_confidence(&settings.weights, &scores);
        info!(
            item = %candidate.id,
            "Match found, confidence {:.2}", scores.confidence
        );
        Verdict::Matched(MatchResult {
            item: candidate,
            scores,
        })
    }
}

fn discard(candidate: &ItemRecord, tier: Tier, scores: MatchScores) -> Verdict {
    info!(item = %candidate.id, "Discarded at {tier} tier.");
    Verdict::Discarded { tier, scores }
}

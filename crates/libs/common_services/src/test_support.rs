use crate::database::run_migrations;
use crate::storage::UploadStore;
use app_state::{MatchingSettings, StorageSettings};
use async_trait::async_trait;
use matching::MatchingEngine;
use oracle::{
    DegradeReason, DescribeFailure, DescriptionOracle, DescriptionOutcome, SimilarityOutcome,
    VisualOracle,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// A migrated in-memory database. One connection, so every query sees the same database.
pub async fn memory_pool() -> color_eyre::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub fn upload_store(dir: &TempDir) -> UploadStore {
    UploadStore::new(&StorageSettings {
        upload_folder: dir.path().to_path_buf(),
        allowed_extensions: vec!["png".into(), "jpg".into(), "jpeg".into(), "gif".into()],
    })
}

/// Names of the files currently in `dir`.
pub fn files_in(dir: &Path) -> color_eyre::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}

/// Describes every image with a fixed text (or fails) and scores every comparison the same.
pub struct FakeOracle {
    pub description: Option<String>,
    pub text_score: f64,
    pub image_score: f64,
    pub describe_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    /// Query images seen by `image_similarity`, in call order.
    pub query_images: Mutex<Vec<PathBuf>>,
}

impl FakeOracle {
    pub fn describing(description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            text_score: 0.9,
            image_score: 0.9,
            describe_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            query_images: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            description: None,
            ..Self::describing("")
        }
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DescriptionOracle for FakeOracle {
    async fn describe(&self, _image: &[u8]) -> DescriptionOutcome {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.description.as_ref().map_or(
            DescriptionOutcome::Failed(DescribeFailure::QuotaExceeded),
            |d| DescriptionOutcome::Generated(d.clone()),
        )
    }

    async fn text_similarity(&self, a: &str, b: &str) -> SimilarityOutcome {
        if a.is_empty() || b.is_empty() {
            return SimilarityOutcome::Degraded(DegradeReason::EmptyInput);
        }
        SimilarityOutcome::Scored(self.text_score)
    }
}

#[async_trait]
impl VisualOracle for FakeOracle {
    async fn image_similarity(&self, a: &Path, b: &Path) -> SimilarityOutcome {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.query_images.lock() {
            seen.push(a.to_path_buf());
        }
        if !a.exists() || !b.exists() {
            return SimilarityOutcome::Degraded(DegradeReason::MissingImage(b.to_path_buf()));
        }
        SimilarityOutcome::Scored(self.image_score)
    }
}

pub fn engine(oracle: &Arc<FakeOracle>, uploads: &UploadStore) -> MatchingEngine {
    MatchingEngine::new(
        oracle.clone(),
        oracle.clone(),
        MatchingSettings::default(),
        uploads.root().to_path_buf(),
    )
}

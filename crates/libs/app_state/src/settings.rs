use crate::{
    ApiSettings, DatabaseSettings, LoggingSettings, MatchingSettings, OracleSettings, RawSettings,
};
use color_eyre::eyre::{bail, Result};
use serde::Deserialize;
use std::path::{absolute, Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub oracles: OracleSettings,
    pub matching: MatchingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Absolute path of the upload folder.
    pub upload_folder: PathBuf,
    pub allowed_extensions: Vec<String>,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let upload_folder = absolute(&raw.storage.upload_folder)?;
        let storage = StorageSettings {
            upload_folder,
            allowed_extensions: raw
                .storage
                .allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        };

        let settings = Self {
            logging: raw.logging,
            api: raw.api,
            storage,
            database: raw.database,
            oracles: raw.oracles,
            matching: raw.matching,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl AppSettings {
    /// Reject configuration the matching pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;
        for (name, endpoint) in [
            ("description", &self.oracles.description),
            ("visual", &self.oracles.visual),
        ] {
            if endpoint.requests_per_second == 0 {
                bail!("oracles.{name}.requests_per_second must be at least 1");
            }
        }
        if self.database.item_id_length < 6 {
            bail!("database.item_id_length must be at least 6");
        }
        Ok(())
    }
}

impl MatchingSettings {
    pub fn validate(&self) -> Result<()> {
        let unit_values = [
            ("description_threshold", self.description_threshold),
            ("metadata_threshold", self.metadata_threshold),
            ("image_threshold", self.image_threshold),
            ("weights.description", self.weights.description),
            ("weights.metadata", self.weights.metadata),
            ("weights.image", self.weights.image),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                bail!("matching.{name} must be within [0, 1], got {value}");
            }
        }
        if self.max_concurrency == 0 {
            bail!("matching.max_concurrency must be at least 1");
        }
        Ok(())
    }
}

impl StorageSettings {
    #[must_use]
    pub fn is_allowed_file(&self, file_name: &str) -> bool {
        let Some(extension) = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
        else {
            return false;
        };
        self.allowed_extensions.contains(&extension)
    }
}

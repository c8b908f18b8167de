use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.yaml";

/// Load the app settings from `config/settings.yaml`, `.env` and `APP__*` environment variables.
pub fn load_app_settings() -> Result<AppSettings> {
    load_app_settings_from(DEFAULT_SETTINGS_PATH)
}

/// Load the app settings from the given YAML file, overridden by the environment.
pub fn load_app_settings_from(path: impl AsRef<Path>) -> Result<AppSettings> {
    // Need to load from dotenv to get API keys into the environment before `config` reads it.
    dotenv::from_path(".env").ok();
    let config_path = path.as_ref().canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    AppSettings::try_from(raw_settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS_YAML: &str = r#"
logging:
  level: info
api:
  host: 127.0.0.1
  port: 5000
  allowed_origins: []
  max_upload_bytes: 16777216
storage:
  upload_folder: uploads
  allowed_extensions: [png, ".JPG"]
database:
  url: "sqlite::memory:"
  max_connections: 1
  acquire_timeout: 5
  item_id_length: 12
oracles:
  description:
    base_url: http://localhost:8080/v1
    model: test-model
    temperature: 0.0
    request_timeout_secs: 30
    requests_per_second: 2
  visual:
    base_url: http://localhost:8081/v1
    model: test-vision-model
    api_key: secret
    temperature: 0.0
    request_timeout_secs: 30
    requests_per_second: 1
matching:
  description_threshold: 0.4
  metadata_threshold: 0.5
  image_threshold: 0.8
  weights:
    description: 0.3
    metadata: 0.3
    image: 0.4
  max_concurrency: 1
"#;

    #[test]
    fn test_load_settings_file() -> Result<()> {
        // ARRANGE
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.yaml");
        fs::write(&path, SETTINGS_YAML)?;

        // ACT
        let settings = load_app_settings_from(&path)?;

        // ASSERT
        assert!(settings.storage.upload_folder.is_absolute());
        assert_eq!(settings.storage.allowed_extensions, vec!["png", "jpg"]);
        assert_eq!(settings.oracles.description.api_key, None);
        assert_eq!(settings.oracles.visual.api_key.as_deref(), Some("secret"));
        assert!((settings.matching.weights.image - 0.4).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_invalid_threshold_fails_to_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.yaml");
        fs::write(
            &path,
            SETTINGS_YAML.replace("image_threshold: 0.8", "image_threshold: 3.0"),
        )?;

        assert!(load_app_settings_from(&path).is_err());
        Ok(())
    }
}

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub storage: RawStorageSettings,
    pub database: DatabaseSettings,
    pub oracles: OracleSettings,
    pub matching: MatchingSettings,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Default tracing filter directive, used when `RUST_LOG` is not set.
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    /// Largest accepted request body, multipart uploads included.
    pub max_upload_bytes: usize,
}

/// Where uploaded item photos live, before paths are made absolute.
#[derive(Debug, Deserialize, Clone)]
pub struct RawStorageSettings {
    pub upload_folder: PathBuf,
    /// Lowercase file extensions accepted for item photos.
    pub allowed_extensions: Vec<String>,
}

/// Database connection and related configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
    /// Length of generated `id` to use for items in the database.
    pub item_id_length: usize,
}

/// One endpoint per oracle capability, so text and vision can use separate keys or models.
#[derive(Debug, Deserialize, Clone)]
pub struct OracleSettings {
    pub description: LlmEndpointSettings,
    pub visual: LlmEndpointSettings,
}

/// An OpenAI-compatible chat completions endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmEndpointSettings {
    /// Base url including the version segment, e.g. `http://localhost:8080/v1`.
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub requests_per_second: u32,
}

/// Thresholds and weights of the tiered matching cascade.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MatchingSettings {
    pub description_threshold: f64,
    pub metadata_threshold: f64,
    pub image_threshold: f64,
    pub weights: ConfidenceWeights,
    /// How many candidates are evaluated at once. 1 keeps evaluation strictly sequential.
    pub max_concurrency: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            description_threshold: 0.40,
            metadata_threshold: 0.50,
            image_threshold: 0.80,
            weights: ConfidenceWeights::default(),
            max_concurrency: 1,
        }
    }
}

/// Weights of the final confidence score, per tier.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ConfidenceWeights {
    pub description: f64,
    pub metadata: f64,
    pub image: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            description: 0.3,
            metadata: 0.3,
            image: 0.4,
        }
    }
}

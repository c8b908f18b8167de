use crate::{
    DegradeReason, DescribeFailure, DescriptionOracle, DescriptionOutcome, SimilarityOutcome,
    VisualOracle, normalize_to_rgb_jpeg, parse_similarity_score,
};
use app_state::LlmEndpointSettings;
use async_trait::async_trait;
use color_eyre::eyre::eyre;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use language_model::{LlmClient, LlmError};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info, warn};

const DESCRIBE_PROMPT: &str = "Describe this item in detail for a lost and found platform. \
Focus on visual characteristics like type, color, material, shape, and any unique markings.";

const IMAGE_SIMILARITY_PROMPT: &str = "On a scale of 0.0 to 1.0, how visually similar are the \
items in these two images?\nRespond ONLY with the numerical score (e.g., 0.90).";

fn text_similarity_prompt(a: &str, b: &str) -> String {
    format!(
        "On a scale of 0.0 to 1.0, how semantically similar are these descriptions?\n\
         1: \"{a}\"\n\
         2: \"{b}\"\n\
         Respond ONLY with the numerical score (e.g., 0.75)."
    )
}

/// Oracle backed by a vision-capable chat model. One instance per endpoint; every
/// request waits on the endpoint's rate limiter first.
#[derive(Clone)]
pub struct LlmOracle {
    client: LlmClient,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl LlmOracle {
    #[must_use]
    pub fn new(client: LlmClient, requests_per_second: NonZeroU32) -> Self {
        Self {
            client,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(requests_per_second))),
        }
    }

    pub fn from_settings(settings: &LlmEndpointSettings) -> color_eyre::Result<Self> {
        let client = LlmClient::with_base_url(&settings.base_url)
            .model(settings.model.clone())
            .maybe_api_key(settings.api_key.clone())
            .temperature(settings.temperature)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        if !client.has_api_key() {
            warn!(
                "No API key configured for {}, requests may be refused.",
                settings.base_url
            );
        }
        let requests_per_second = NonZeroU32::new(settings.requests_per_second)
            .ok_or_else(|| eyre!("requests_per_second must be at least 1"))?;
        info!(
            "Oracle '{}' ready at {} ({requests_per_second} req/s).",
            settings.model, settings.base_url
        );
        Ok(Self::new(client, requests_per_second))
    }

    async fn ask(&self, prompt: &str, images: &[&[u8]]) -> Result<String, LlmError> {
        self.limiter.until_ready().await;
        let response = self.client.chat(prompt).images(images).call().await?;
        debug!("Oracle response: {response}");
        Ok(response)
    }

    async fn prepare_image(bytes: Vec<u8>) -> Result<Vec<u8>, String> {
        tokio::task::spawn_blocking(move || normalize_to_rgb_jpeg(&bytes))
            .await
            .map_err(|e| e.to_string())?
            .map_err(|e| e.to_string())
    }

    fn score_response(kind: &str, response: Result<String, LlmError>) -> SimilarityOutcome {
        match response {
            Ok(text) => {
                if let Some(score) = parse_similarity_score(&text) {
                    SimilarityOutcome::Scored(score)
                } else {
                    warn!("Could not parse number from {kind} similarity response: {text}");
                    SimilarityOutcome::Degraded(DegradeReason::Unparseable(text))
                }
            }
            Err(e) => {
                warn!("Comparing {kind}s failed: {e}");
                SimilarityOutcome::Degraded(DegradeReason::Transport(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl DescriptionOracle for LlmOracle {
    async fn describe(&self, image: &[u8]) -> DescriptionOutcome {
        if self.client.model().is_empty() {
            warn!("Attempted to generate description, but no model is configured.");
            return DescriptionOutcome::Failed(DescribeFailure::NotConfigured);
        }
        let prepared = match Self::prepare_image(image.to_vec()).await {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Cannot prepare image for description: {e}");
                return DescriptionOutcome::Failed(DescribeFailure::UnreadableImage(e));
            }
        };

        match self.ask(DESCRIBE_PROMPT, &[prepared.as_slice()]).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    DescriptionOutcome::Failed(DescribeFailure::EmptyResponse)
                } else {
                    DescriptionOutcome::Generated(text.to_string())
                }
            }
            Err(e) => {
                warn!("Error generating description: {e}");
                DescriptionOutcome::Failed(classify_failure(&e))
            }
        }
    }

    async fn text_similarity(&self, a: &str, b: &str) -> SimilarityOutcome {
        if a.trim().is_empty() || b.trim().is_empty() {
            return SimilarityOutcome::Degraded(DegradeReason::EmptyInput);
        }
        let prompt = text_similarity_prompt(a, b);
        Self::score_response("description", self.ask(&prompt, &[]).await)
    }
}

#[async_trait]
impl VisualOracle for LlmOracle {
    async fn image_similarity(&self, a: &Path, b: &Path) -> SimilarityOutcome {
        for path in [a, b] {
            if !fs::try_exists(path).await.unwrap_or(false) {
                warn!("Image file not found: {}", path.display());
                return SimilarityOutcome::Degraded(DegradeReason::MissingImage(
                    path.to_path_buf(),
                ));
            }
        }
        let (a_bytes, b_bytes) = match tokio::try_join!(fs::read(a), fs::read(b)) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read images for comparison: {e}");
                return SimilarityOutcome::Degraded(DegradeReason::UnreadableImage(e.to_string()));
            }
        };
        let (a_image, b_image) =
            match tokio::try_join!(Self::prepare_image(a_bytes), Self::prepare_image(b_bytes)) {
                Ok(images) => images,
                Err(e) => {
                    warn!("Cannot prepare images for comparison: {e}");
                    return SimilarityOutcome::Degraded(DegradeReason::UnreadableImage(e));
                }
            };

        debug!("Comparing images {} and {}", a.display(), b.display());
        let response = self
            .ask(
                IMAGE_SIMILARITY_PROMPT,
                &[a_image.as_slice(), b_image.as_slice()],
            )
            .await;
        Self::score_response("image", response)
    }
}

/// Map a transport or API failure onto the describe failure shown to users.
fn classify_failure(err: &LlmError) -> DescribeFailure {
    let text = err.to_string();
    let lower = text.to_lowercase();
    let status = err.status().map(|s| s.as_u16());

    if matches!(status, Some(401 | 403)) || lower.contains("api key") {
        DescribeFailure::InvalidCredentials
    } else if status == Some(429) || lower.contains("quota") {
        DescribeFailure::QuotaExceeded
    } else if err.is_timeout() || text.contains("DeadlineExceeded") {
        DescribeFailure::Timeout
    } else if status == Some(503)
        || text.contains("ResourceExhausted")
        || text.contains("RESOURCE_EXHAUSTED")
    {
        DescribeFailure::ResourceExhausted
    } else {
        DescribeFailure::Other(text)
    }
}

#![allow(clippy::missing_errors_doc)]

use color_eyre::eyre::{Result, eyre};
use language_model::LlmClient;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Usage: `call_llm <base_url> <model> <image> [other_image]`
pub async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [base_url, model, images @ ..] = args.as_slice() else {
        return Err(eyre!("usage: call_llm <base_url> <model> <image> [other_image]"));
    };
    let client = LlmClient::with_base_url(base_url)
        .model(model.clone())
        .maybe_api_key(std::env::var("LLM_API_KEY").ok())
        .timeout(Duration::from_secs(120))
        .build()?;

    let mut loaded = Vec::new();
    for path in images {
        loaded.push(tokio::fs::read(path).await?);
    }
    let image_refs: Vec<&[u8]> = loaded.iter().map(Vec::as_slice).collect();
    let prompt = if image_refs.len() > 1 {
        "On a scale of 0.0 to 1.0, how visually similar are the items in these two images? \
         Respond ONLY with the numerical score (e.g., 0.90)."
    } else {
        "Describe this item in detail for a lost and found platform."
    };

    let now = Instant::now();
    let answer = client.chat(prompt).images(&image_refs).call().await?;
    info!("Answer: {answer}");
    info!("Total time: {:?}", now.elapsed());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    color_eyre::install()?;

    run().await?;

    Ok(())
}

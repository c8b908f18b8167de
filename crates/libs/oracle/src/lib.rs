#![deny(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

mod capabilities;
mod image_prep;
mod llm_oracle;
mod outcome;
mod score;

pub use capabilities::*;
pub use image_prep::normalize_to_rgb_jpeg;
pub use llm_oracle::LlmOracle;
pub use outcome::*;
pub use score::parse_similarity_score;

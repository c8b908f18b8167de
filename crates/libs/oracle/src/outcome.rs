use std::path::PathBuf;
use thiserror::Error;

/// Why a description could not be generated. The `Display` text is the user-facing
/// warning and always starts with `Error:`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeFailure {
    #[error("Error: Description oracle is not configured.")]
    NotConfigured,
    #[error("Error: Invalid/missing API key.")]
    InvalidCredentials,
    #[error("Error: API quota exceeded.")]
    QuotaExceeded,
    #[error("Error: API request timed out.")]
    Timeout,
    #[error("Error: API resource exhausted.")]
    ResourceExhausted,
    #[error("Error: Image could not be read ({0}).")]
    UnreadableImage(String),
    #[error("Error: AI could not generate a description.")]
    EmptyResponse,
    #[error("Error: Generating AI description failed ({0}).")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionOutcome {
    Generated(String),
    Failed(DescribeFailure),
}

/// Why a similarity call fell back to a score of 0.0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegradeReason {
    #[error("one of the inputs is empty")]
    EmptyInput,
    #[error("image not found: {}", .0.display())]
    MissingImage(PathBuf),
    #[error("image could not be read: {0}")]
    UnreadableImage(String),
    #[error("no number in oracle response: {0:?}")]
    Unparseable(String),
    #[error("oracle call failed: {0}")]
    Transport(String),
}

/// Result of a similarity call. Never an error: failures degrade to a score of 0.0.
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityOutcome {
    Scored(f64),
    Degraded(DegradeReason),
}

impl SimilarityOutcome {
    /// The score in [0, 1], 0.0 when degraded.
    #[must_use]
    pub const fn score(&self) -> f64 {
        match self {
            Self::Scored(score) => *score,
            Self::Degraded(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_failures_carry_error_prefix() {
        let failures = [
            DescribeFailure::NotConfigured,
            DescribeFailure::InvalidCredentials,
            DescribeFailure::QuotaExceeded,
            DescribeFailure::Timeout,
            DescribeFailure::ResourceExhausted,
            DescribeFailure::UnreadableImage("bad header".into()),
            DescribeFailure::EmptyResponse,
            DescribeFailure::Other("connection reset".into()),
        ];
        for failure in failures {
            assert!(failure.to_string().starts_with("Error:"), "{failure}");
        }
    }

    #[test]
    fn degraded_similarity_scores_zero() {
        let outcome = SimilarityOutcome::Degraded(DegradeReason::EmptyInput);
        assert!(outcome.score().abs() < f64::EPSILON);
        assert!((SimilarityOutcome::Scored(0.7).score() - 0.7).abs() < f64::EPSILON);
    }
}

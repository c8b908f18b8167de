use regex::Regex;
use std::sync::LazyLock;

// The integer alternative is unsigned, so "-1" yields 1.
static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").expect("score pattern is valid"));

/// Pull the first number out of a free-form oracle response and clamp it to [0, 1].
///
/// Returns `None` when the response holds no number, callers treat that as a score of 0.0.
#[must_use]
pub fn parse_similarity_score(response: &str) -> Option<f64> {
    let found = SCORE_PATTERN.find(response)?;
    let value = found.as_str().parse::<f64>().ok()?;
    Some(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.75", Some(0.75))]
    #[case("Similarity: 0.9 out of 1", Some(0.9))]
    #[case("1.5", Some(1.0))]
    #[case("-0.2", Some(0.0))]
    #[case("1", Some(1.0))]
    #[case("0", Some(0.0))]
    #[case(".85", Some(0.85))]
    #[case("+0.3 seems right", Some(0.3))]
    #[case("  0.60\n", Some(0.6))]
    #[case("I would say 7 out of 10", Some(1.0))]
    #[case("not similar at all", None)]
    #[case("", None)]
    fn test_parse_similarity_score(#[case] response: &str, #[case] expected: Option<f64>) {
        let parsed = parse_similarity_score(response);
        match (parsed, expected) {
            (Some(p), Some(e)) => assert!((p - e).abs() < 1e-9, "{response:?}: {p} != {e}"),
            (None, None) => {}
            _ => panic!("{response:?}: got {parsed:?}, expected {expected:?}"),
        }
    }

    #[test]
    fn unsigned_integer_ignores_minus_sign() {
        assert_eq!(parse_similarity_score("-1"), Some(1.0));
    }
}

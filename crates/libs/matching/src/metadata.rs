use common_types::AttributeSet;

/// How one attribute contributes to the metadata score.
struct AttributeRule {
    weight: f64,
    /// Credit when one value contains the other (and they are not equal).
    partial_credit: Option<f64>,
    /// Credit when both sides lack the attribute.
    both_absent_bonus: Option<f64>,
    select: fn(&AttributeSet) -> &str,
}

impl AttributeRule {
    fn credit(&self, a: &str, b: &str) -> f64 {
        if !a.is_empty() && a == b {
            return self.weight;
        }
        if let Some(partial) = self.partial_credit
            && !a.is_empty()
            && !b.is_empty()
            && (a.contains(b) || b.contains(a))
        {
            return partial;
        }
        if let Some(bonus) = self.both_absent_bonus
            && a.is_empty()
            && b.is_empty()
        {
            return bonus;
        }
        0.0
    }
}

// Only brand earns a bonus when absent on both sides.
const RULES: [AttributeRule; 4] = [
    AttributeRule {
        weight: 1.5,
        partial_credit: None,
        both_absent_bonus: None,
        select: |a| a.item_type.as_str(),
    },
    AttributeRule {
        weight: 1.0,
        partial_credit: Some(0.5),
        both_absent_bonus: None,
        select: |a| a.color.as_str(),
    },
    AttributeRule {
        weight: 1.0,
        partial_credit: Some(0.5),
        both_absent_bonus: Some(0.25),
        select: |a| a.brand.as_str(),
    },
    AttributeRule {
        weight: 1.0,
        partial_credit: Some(0.5),
        both_absent_bonus: None,
        select: |a| a.location.as_str(),
    },
];

/// Similarity of two lowercased attribute sets in [0, 1].
///
/// Each attribute adds its full weight on an exact match, partial credit when one value
/// contains the other, and nothing otherwise. The result is the collected credit over the
/// sum of all weights.
#[must_use]
pub fn metadata_similarity(a: &AttributeSet, b: &AttributeSet) -> f64 {
    let mut score = 0.0;
    let mut max_possible_score = 0.0;
    for rule in &RULES {
        max_possible_score += rule.weight;
        score += rule.credit((rule.select)(a), (rule.select)(b));
    }
    if max_possible_score > 0.0 {
        score / max_possible_score
    } else {
        0.0
    }
}

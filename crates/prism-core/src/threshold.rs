//! Confidence thresholding policies.
//!
//! Two policies are supported per category: a fixed cutoff, and adaptive
//! maximum-cut thresholding (MCut) which places the cutoff at the largest
//! gap between consecutive sorted confidences. Acceptance is strict
//! (`confidence > cutoff`) in both cases.

use std::cmp::Ordering;

use crate::types::{TagScore, ThresholdPolicy};

/// Maximum Cut Thresholding (MCut).
///
/// Sorts the confidences descending, finds the largest difference between
/// adjacent values (first occurrence wins ties), and returns the midpoint
/// of that pair. An empty slice yields 0.0; a single value yields itself,
/// which under strict acceptance admits nothing.
pub fn mcut_threshold(probs: &[f32]) -> f32 {
    if probs.is_empty() {
        return 0.0;
    }

    let mut sorted = probs.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    if sorted.len() == 1 {
        return sorted[0];
    }

    let mut cut = 0;
    let mut max_gap = f32::NEG_INFINITY;
    for i in 0..sorted.len() - 1 {
        let gap = sorted[i] - sorted[i + 1];
        if gap > max_gap {
            max_gap = gap;
            cut = i;
        }
    }

    (sorted[cut] + sorted[cut + 1]) / 2.0
}

impl ThresholdPolicy {
    /// Resolve this policy into a concrete cutoff for the given confidences.
    ///
    /// For `AdaptiveMaxCut` the computed threshold is clamped upward to the
    /// floor, preventing near-zero cutoffs when all confidences cluster low.
    pub fn cutoff(&self, probs: &[f32]) -> f32 {
        match *self {
            Self::Fixed(value) => value,
            Self::AdaptiveMaxCut { floor } => mcut_threshold(probs).max(floor),
        }
    }
}

/// Apply a policy to a category's scores, keeping entries strictly above
/// the resolved cutoff. Input order is preserved.
pub fn accept(scores: &[TagScore], policy: ThresholdPolicy) -> Vec<TagScore> {
    let probs: Vec<f32> = scores.iter().map(|t| t.confidence).collect();
    let cutoff = policy.cutoff(&probs);
    scores
        .iter()
        .filter(|t| t.confidence > cutoff)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcut_reference_vector() {
        // Differences are [0.3, 0.1, 0.4]; max at index 2;
        // threshold = (0.5 + 0.1) / 2 = 0.3.
        let thresh = mcut_threshold(&[0.9, 0.6, 0.5, 0.1]);
        assert!((thresh - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_mcut_unsorted_input() {
        let thresh = mcut_threshold(&[0.1, 0.5, 0.9, 0.6]);
        assert!((thresh - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_mcut_single_value() {
        assert_eq!(mcut_threshold(&[0.7]), 0.7);
    }

    #[test]
    fn test_mcut_empty() {
        assert_eq!(mcut_threshold(&[]), 0.0);
    }

    #[test]
    fn test_mcut_tie_takes_first_gap() {
        // Gaps are [0.2, 0.2]; the first occurrence wins, so the cut is
        // between 0.9 and 0.7.
        let thresh = mcut_threshold(&[0.9, 0.7, 0.5]);
        assert!((thresh - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_acceptance_is_strict() {
        let scores = vec![
            TagScore::new("a", 0.9),
            TagScore::new("b", 0.6),
            TagScore::new("c", 0.5),
            TagScore::new("d", 0.1),
        ];
        let kept = accept(&scores, ThresholdPolicy::AdaptiveMaxCut { floor: 0.0 });
        let names: Vec<&str> = kept.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_single_value_accepts_nothing() {
        let scores = vec![TagScore::new("only", 0.7)];
        let kept = accept(&scores, ThresholdPolicy::AdaptiveMaxCut { floor: 0.0 });
        assert!(kept.is_empty());
    }

    #[test]
    fn test_floor_clamps_adaptive_threshold() {
        // MCut alone would pick (0.09 + 0.02) / 2 = 0.055; the floor wins.
        let probs = [0.09, 0.08, 0.02];
        let policy = ThresholdPolicy::AdaptiveMaxCut { floor: 0.15 };
        assert_eq!(policy.cutoff(&probs), 0.15);

        let scores: Vec<TagScore> = probs
            .iter()
            .enumerate()
            .map(|(i, &p)| TagScore::new(format!("t{i}"), p))
            .collect();
        assert!(accept(&scores, policy).is_empty());
    }

    #[test]
    fn test_floor_does_not_lower_threshold() {
        let probs = [0.9, 0.2];
        let policy = ThresholdPolicy::AdaptiveMaxCut { floor: 0.15 };
        assert!((policy.cutoff(&probs) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_policy_ignores_distribution() {
        let scores = vec![TagScore::new("a", 0.36), TagScore::new("b", 0.35)];
        let kept = accept(&scores, ThresholdPolicy::Fixed(0.35));
        assert_eq!(kept.len(), 1, "0.35 must not clear a 0.35 cutoff");
        assert_eq!(kept[0].name, "a");
    }
}

//! Rendering accepted tags into the two output dialects.
//!
//! The standard dialect is a comma-separated, confidence-descending list
//! with parentheses escaped. The imageboard dialect is space-separated
//! underscore tags, translated through the lexicon where a fixed spelling
//! exists and slugged generically otherwise. An enriched imageboard
//! variant buckets tags by category and always places NSFW tags last,
//! a display convention rather than a confidence ranking.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::types::TagScore;

use super::lexicon::Lexicon;

/// Category buckets for the enriched imageboard dialect, in emission
/// priority order. NSFW is emitted last regardless of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagBucket {
    Character,
    Quality,
    Style,
    Clothing,
    Pose,
    Background,
    Other,
    Nsfw,
}

/// Emission order for bucketed output.
const BUCKET_ORDER: &[TagBucket] = &[
    TagBucket::Character,
    TagBucket::Quality,
    TagBucket::Style,
    TagBucket::Clothing,
    TagBucket::Pose,
    TagBucket::Background,
    TagBucket::Other,
    TagBucket::Nsfw,
];

/// Renders accepted tag sets into output strings.
pub struct TagFormatter {
    lexicon: Lexicon,
}

impl TagFormatter {
    /// Create a formatter over the given lexicon.
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Standard dialect: confidence-descending (stable on ties), internal
    /// whitespace collapsed, parentheses escaped, joined with `", "`.
    pub fn standard(&self, scores: &[TagScore]) -> String {
        if scores.is_empty() {
            return String::new();
        }

        let sorted = sort_by_confidence(scores);
        let cleaned: Vec<String> = sorted.iter().map(|t| clean_name(&t.name)).collect();
        cleaned.join(", ")
    }

    /// Imageboard dialect: confidence-descending, lexicon translation with
    /// generic slug fallback, deduplicated by output string keeping the
    /// first-seen (highest-confidence) occurrence, joined with spaces.
    pub fn imageboard(&self, scores: &[TagScore]) -> String {
        if scores.is_empty() {
            return String::new();
        }

        let sorted = sort_by_confidence(scores);
        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for tag in &sorted {
            let slugged = self.slug(&tag.name);
            if !slugged.is_empty() && seen.insert(slugged.clone()) {
                out.push(slugged);
            }
        }
        out.join(" ")
    }

    /// Enriched imageboard dialect.
    ///
    /// Deduplicates case-insensitively by name (keeping the higher
    /// confidence), drops tags below `min_confidence`, buckets the general
    /// tags by lexicon category, and emits buckets in priority order:
    /// accepted character tags first, NSFW-flagged tags last.
    pub fn imageboard_enriched(
        &self,
        general: &[TagScore],
        characters: &[TagScore],
        min_confidence: f32,
    ) -> String {
        let deduped = dedupe_by_name(general);
        let filtered = filter_by_confidence(&deduped, min_confidence);

        let mut buckets: HashMap<TagBucket, Vec<&TagScore>> = HashMap::new();
        for tag in characters {
            buckets.entry(TagBucket::Character).or_default().push(tag);
        }
        for tag in &filtered {
            buckets.entry(self.bucket(&tag.name)).or_default().push(tag);
        }

        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for bucket in BUCKET_ORDER {
            let Some(tags) = buckets.get(bucket) else {
                continue;
            };
            for tag in tags {
                let slugged = self.slug(&tag.name);
                if !slugged.is_empty() && seen.insert(slugged.clone()) {
                    out.push(slugged);
                }
            }
        }
        out.join(" ")
    }

    /// Imageboard spelling for one display name: the lexicon's fixed
    /// translation when present, otherwise the generic slug transform.
    pub fn slug(&self, name: &str) -> String {
        match self.lexicon.translate(name) {
            Some(fixed) => fixed.to_string(),
            None => generic_slug(name),
        }
    }

    /// Classify a general tag into its enriched-dialect bucket.
    ///
    /// Keyword containment is checked before set membership, matching the
    /// established precedence: clothing, pose, background, quality, style,
    /// NSFW, other.
    fn bucket(&self, name: &str) -> TagBucket {
        let lower = name.to_lowercase();
        if self.lexicon.is_clothing(&lower) {
            TagBucket::Clothing
        } else if self.lexicon.is_pose(&lower) {
            TagBucket::Pose
        } else if self.lexicon.is_background(&lower) {
            TagBucket::Background
        } else if self.lexicon.is_quality(&lower) {
            TagBucket::Quality
        } else if self.lexicon.is_style(&lower) {
            TagBucket::Style
        } else if self.lexicon.is_nsfw(&lower) {
            TagBucket::Nsfw
        } else {
            TagBucket::Other
        }
    }
}

impl Default for TagFormatter {
    fn default() -> Self {
        Self::new(Lexicon::new())
    }
}

/// Stable sort by confidence descending; ties keep input order.
fn sort_by_confidence(scores: &[TagScore]) -> Vec<TagScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Collapse whitespace runs to single spaces, trim, and escape parens.
fn clean_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace('(', "\\(").replace(')', "\\)")
}

/// Generic imageboard slug: spaces to underscores, strip characters other
/// than alphanumerics, underscores, and hyphens, collapse repeated
/// underscores, trim edge underscores. Idempotent on its own output.
fn generic_slug(name: &str) -> String {
    let underscored = name.replace(' ', "_");
    let stripped: String = underscored
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    let mut collapsed = String::with_capacity(stripped.len());
    let mut prev_underscore = false;
    for c in stripped.chars() {
        if c == '_' {
            if !prev_underscore {
                collapsed.push(c);
            }
            prev_underscore = true;
        } else {
            collapsed.push(c);
            prev_underscore = false;
        }
    }

    collapsed.trim_matches('_').to_string()
}

/// Keep only tags with confidence at or above `min` (inclusive).
pub fn filter_by_confidence(scores: &[TagScore], min: f32) -> Vec<TagScore> {
    scores
        .iter()
        .filter(|t| t.confidence >= min)
        .cloned()
        .collect()
}

/// Top `n` tags by confidence (stable on ties).
pub fn top_n(scores: &[TagScore], n: usize) -> Vec<TagScore> {
    let mut sorted = sort_by_confidence(scores);
    sorted.truncate(n);
    sorted
}

/// Deduplicate case-insensitively by name, keeping the higher-confidence
/// occurrence in the position where the name was first seen.
pub fn dedupe_by_name(scores: &[TagScore]) -> Vec<TagScore> {
    let mut out: Vec<TagScore> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for tag in scores {
        let key = tag.name.to_lowercase().trim().to_string();
        match index_of.get(&key) {
            Some(&i) => {
                if out[i].confidence < tag.confidence {
                    out[i] = tag.clone();
                }
            }
            None => {
                index_of.insert(key, out.len());
                out.push(tag.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> TagFormatter {
        TagFormatter::default()
    }

    #[test]
    fn test_standard_sorts_by_confidence() {
        let out = formatter().standard(&[
            TagScore::new("long hair", 0.8),
            TagScore::new("1girl", 0.9),
        ]);
        assert_eq!(out, "1girl, long hair");
    }

    #[test]
    fn test_standard_escapes_parentheses() {
        let out = formatter().standard(&[TagScore::new("fate (series)", 0.9)]);
        assert_eq!(out, "fate \\(series\\)");
    }

    #[test]
    fn test_standard_collapses_whitespace() {
        let out = formatter().standard(&[TagScore::new("  long   hair ", 0.8)]);
        assert_eq!(out, "long hair");
    }

    #[test]
    fn test_standard_empty_input() {
        assert_eq!(formatter().standard(&[]), "");
    }

    #[test]
    fn test_standard_stable_on_ties() {
        let out = formatter().standard(&[
            TagScore::new("first", 0.5),
            TagScore::new("second", 0.5),
        ]);
        assert_eq!(out, "first, second");
    }

    #[test]
    fn test_imageboard_uses_translation_table() {
        let out = formatter().imageboard(&[TagScore::new("long hair", 0.8)]);
        assert_eq!(out, "long_hair");
    }

    #[test]
    fn test_imageboard_fixed_spelling_wins_over_slug() {
        let out = formatter().imageboard(&[TagScore::new("one piece swimsuit", 0.8)]);
        assert_eq!(out, "one-piece_swimsuit");
    }

    #[test]
    fn test_imageboard_generic_slug() {
        let out = formatter().imageboard(&[TagScore::new("wearing a red hat!", 0.8)]);
        assert_eq!(out, "wearing_a_red_hat");
    }

    #[test]
    fn test_imageboard_orders_and_joins_with_space() {
        let out = formatter().imageboard(&[
            TagScore::new("smile", 0.7),
            TagScore::new("long hair", 0.9),
        ]);
        assert_eq!(out, "long_hair smile");
    }

    #[test]
    fn test_imageboard_dedupes_by_output() {
        // Both names slug to "long_hair"; the higher-confidence one came
        // first after sorting, so one entry survives.
        let out = formatter().imageboard(&[
            TagScore::new("long hair", 0.9),
            TagScore::new("long_hair!", 0.5),
        ]);
        assert_eq!(out, "long_hair");
    }

    #[test]
    fn test_slug_idempotent() {
        let f = formatter();
        let once = f.slug("wearing a red hat!");
        assert_eq!(f.slug(&once), once);
        assert_eq!(f.slug("long_hair"), "long_hair");
    }

    #[test]
    fn test_dedupe_keeps_higher_confidence() {
        let deduped = dedupe_by_name(&[
            TagScore::new("Smile", 0.4),
            TagScore::new("smile", 0.9),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].name, "smile");
        assert!((deduped[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_dedupe_preserves_first_seen_position() {
        let deduped = dedupe_by_name(&[
            TagScore::new("smile", 0.9),
            TagScore::new("blush", 0.8),
            TagScore::new("SMILE", 0.95),
        ]);
        let names: Vec<&str> = deduped.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["SMILE", "blush"]);
    }

    #[test]
    fn test_filter_by_confidence_is_inclusive() {
        let kept = filter_by_confidence(
            &[TagScore::new("a", 0.1), TagScore::new("b", 0.09)],
            0.1,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "a");
    }

    #[test]
    fn test_top_n() {
        let top = top_n(
            &[
                TagScore::new("a", 0.2),
                TagScore::new("b", 0.9),
                TagScore::new("c", 0.5),
            ],
            2,
        );
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_enriched_places_nsfw_last() {
        let out = formatter().imageboard_enriched(
            &[
                TagScore::new("nude", 0.99),
                TagScore::new("smile", 0.5),
                TagScore::new("school uniform", 0.4),
            ],
            &[],
            0.1,
        );
        assert_eq!(out, "school_uniform smile nude");
    }

    #[test]
    fn test_enriched_characters_come_first() {
        let out = formatter().imageboard_enriched(
            &[TagScore::new("smile", 0.9)],
            &[TagScore::new("hatsune miku", 0.97)],
            0.1,
        );
        assert_eq!(out, "hatsune_miku smile");
    }

    #[test]
    fn test_enriched_filters_low_confidence() {
        let out = formatter().imageboard_enriched(
            &[TagScore::new("smile", 0.9), TagScore::new("blush", 0.05)],
            &[],
            0.1,
        );
        assert_eq!(out, "smile");
    }

    #[test]
    fn test_enriched_bucket_precedence() {
        // "masterpiece" is quality, "watercolor" is style, "sitting" is a
        // pose keyword, "beach" matches a background keyword.
        let out = formatter().imageboard_enriched(
            &[
                TagScore::new("beach", 0.6),
                TagScore::new("watercolor", 0.7),
                TagScore::new("sitting", 0.8),
                TagScore::new("masterpiece", 0.5),
            ],
            &[],
            0.1,
        );
        assert_eq!(out, "masterpiece watercolor sitting beach");
    }
}

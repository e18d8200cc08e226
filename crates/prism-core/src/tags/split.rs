//! Confidence-vector partitioning by tag category.

use crate::labels::LabelTable;
use crate::types::TagScore;

/// The confidence vector projected into the three category partitions.
///
/// Each list pairs display names with confidences and preserves the
/// original vector order; nothing is sorted or thresholded here.
#[derive(Debug, Clone)]
pub struct CategoryScores {
    pub ratings: Vec<TagScore>,
    pub general: Vec<TagScore>,
    pub characters: Vec<TagScore>,
}

/// Partition a confidence vector through the table's index sets.
pub fn split(confidences: &[f32], table: &LabelTable) -> CategoryScores {
    CategoryScores {
        ratings: project(confidences, table, table.rating_indexes()),
        general: project(confidences, table, table.general_indexes()),
        characters: project(confidences, table, table.character_indexes()),
    }
}

fn project(confidences: &[f32], table: &LabelTable, indexes: &[usize]) -> Vec<TagScore> {
    indexes
        .iter()
        .filter_map(|&i| {
            confidences
                .get(i)
                .map(|&c| TagScore::new(table.name(i), c))
        })
        .collect()
}

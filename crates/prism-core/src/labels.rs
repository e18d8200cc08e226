//! Label table loading for the tagger vocabulary.
//!
//! The label table is the static ordered vocabulary the model's confidence
//! vector is aligned with, plus the per-category index partition used to
//! interpret it. Loaded from a `selected_tags.csv`-style file with `name`
//! and `category` columns.

use std::path::Path;

use crate::error::TaggerError;

/// Tag category codes as used by the label file. The numeric values are an
/// externally imposed convention of the published tag tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    General,
    Character,
    Rating,
}

impl TagCategory {
    /// Map a label-file category code to a category.
    ///
    /// Unknown codes return `None`; such entries stay in the table (the
    /// confidence vector is index-aligned) but join no index set.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::General),
            4 => Some(Self::Character),
            9 => Some(Self::Rating),
            _ => None,
        }
    }

    /// The label-file code for this category.
    pub fn code(&self) -> u32 {
        match self {
            Self::General => 0,
            Self::Character => 4,
            Self::Rating => 9,
        }
    }
}

/// Emoticon tag names whose underscores are part of the face, not word
/// separators. These bypass the underscore-to-space normalization.
const KAOMOJIS: &[&str] = &[
    "0_0", "(o)_(o)", "+_+", "+_-", "._.", "<o>_<o>", "<|>_<|>", "=_=", ">_<", "3_3", "6_9",
    ">_o", "@_@", "^_^", "o_o", "u_u", "x_x", "|_|", "||_||",
];

/// A single vocabulary entry.
#[derive(Debug, Clone)]
pub struct LabelEntry {
    /// Display name (underscores replaced with spaces, kaomojis kept as-is)
    pub name: String,
    /// Category, if the label file's code was recognized
    pub category: Option<TagCategory>,
}

/// The loaded vocabulary plus derived per-category index sets.
///
/// Index sets preserve the original vector order and never overlap;
/// uncategorized entries appear in none of them.
#[derive(Debug)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
    rating_indexes: Vec<usize>,
    general_indexes: Vec<usize>,
    character_indexes: Vec<usize>,
}

impl LabelTable {
    /// Load a label table from a CSV file on disk.
    pub fn from_csv_file(path: &Path) -> Result<Self, TaggerError> {
        let content = std::fs::read_to_string(path).map_err(|e| TaggerError::Labels {
            path: path.to_path_buf(),
            message: format!("Failed to read label file: {e}"),
        })?;
        Self::from_csv(&content, path)
    }

    /// Parse a label table from CSV content.
    ///
    /// The header row must contain `name` and `category` columns; other
    /// columns (ids, counts) are ignored.
    pub fn from_csv(content: &str, path: &Path) -> Result<Self, TaggerError> {
        let mut lines = content.lines();
        let header = lines.next().ok_or_else(|| TaggerError::Labels {
            path: path.to_path_buf(),
            message: "Label file is empty".to_string(),
        })?;

        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let name_col = columns
            .iter()
            .position(|c| *c == "name")
            .ok_or_else(|| TaggerError::Labels {
                path: path.to_path_buf(),
                message: "Label file has no `name` column".to_string(),
            })?;
        let category_col =
            columns
                .iter()
                .position(|c| *c == "category")
                .ok_or_else(|| TaggerError::Labels {
                    path: path.to_path_buf(),
                    message: "Label file has no `category` column".to_string(),
                })?;

        let mut rows = Vec::new();
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            let name = fields.get(name_col).map(|s| s.trim()).unwrap_or_default();
            if name.is_empty() {
                return Err(TaggerError::Labels {
                    path: path.to_path_buf(),
                    message: format!("Empty tag name on line {}", line_no + 2),
                });
            }
            let code: u32 = fields
                .get(category_col)
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| TaggerError::Labels {
                    path: path.to_path_buf(),
                    message: format!("Bad category code on line {}", line_no + 2),
                })?;
            rows.push((name.to_string(), code));
        }

        Ok(Self::from_rows(rows))
    }

    /// Build a table from already-parsed (raw name, category code) rows.
    pub fn from_rows(rows: Vec<(String, u32)>) -> Self {
        let mut entries = Vec::with_capacity(rows.len());
        let mut rating_indexes = Vec::new();
        let mut general_indexes = Vec::new();
        let mut character_indexes = Vec::new();

        for (i, (raw_name, code)) in rows.into_iter().enumerate() {
            let name = normalize_name(&raw_name);
            let category = TagCategory::from_code(code);
            match category {
                Some(TagCategory::Rating) => rating_indexes.push(i),
                Some(TagCategory::General) => general_indexes.push(i),
                Some(TagCategory::Character) => character_indexes.push(i),
                None => {}
            }
            entries.push(LabelEntry { name, category });
        }

        tracing::debug!(
            "Loaded label table: {} entries ({} general, {} character, {} rating)",
            entries.len(),
            general_indexes.len(),
            character_indexes.len(),
            rating_indexes.len(),
        );

        Self {
            entries,
            rating_indexes,
            general_indexes,
            character_indexes,
        }
    }

    /// Number of entries (the expected confidence vector length).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in vector order.
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// Display name of the entry at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    /// Indexes of rating entries, in vector order.
    pub fn rating_indexes(&self) -> &[usize] {
        &self.rating_indexes
    }

    /// Indexes of general entries, in vector order.
    pub fn general_indexes(&self) -> &[usize] {
        &self.general_indexes
    }

    /// Indexes of character entries, in vector order.
    pub fn character_indexes(&self) -> &[usize] {
        &self.character_indexes
    }
}

/// Replace underscores with spaces unless the raw name is a kaomoji.
fn normalize_name(raw: &str) -> String {
    if KAOMOJIS.contains(&raw) {
        raw.to_string()
    } else {
        raw.replace('_', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn table_from_csv(content: &str) -> Result<LabelTable, TaggerError> {
        LabelTable::from_csv(content, &PathBuf::from("selected_tags.csv"))
    }

    #[test]
    fn test_category_codes_roundtrip() {
        assert_eq!(TagCategory::from_code(0), Some(TagCategory::General));
        assert_eq!(TagCategory::from_code(4), Some(TagCategory::Character));
        assert_eq!(TagCategory::from_code(9), Some(TagCategory::Rating));
        assert_eq!(TagCategory::from_code(1), None);
        assert_eq!(TagCategory::General.code(), 0);
        assert_eq!(TagCategory::Character.code(), 4);
        assert_eq!(TagCategory::Rating.code(), 9);
    }

    #[test]
    fn test_underscores_become_spaces() {
        let table = LabelTable::from_rows(vec![("long_hair".to_string(), 0)]);
        assert_eq!(table.name(0), "long hair");
    }

    #[test]
    fn test_kaomoji_keeps_underscores() {
        let table = LabelTable::from_rows(vec![
            ("^_^".to_string(), 0),
            ("(o)_(o)".to_string(), 0),
            ("o_o".to_string(), 0),
        ]);
        assert_eq!(table.name(0), "^_^");
        assert_eq!(table.name(1), "(o)_(o)");
        assert_eq!(table.name(2), "o_o");
    }

    #[test]
    fn test_index_sets_partition_without_overlap() {
        let table = LabelTable::from_rows(vec![
            ("general".to_string(), 9),
            ("sensitive".to_string(), 9),
            ("1girl".to_string(), 0),
            ("hatsune_miku".to_string(), 4),
            ("smile".to_string(), 0),
            ("mystery".to_string(), 7), // unknown code: excluded everywhere
        ]);

        assert_eq!(table.rating_indexes(), &[0, 1]);
        assert_eq!(table.general_indexes(), &[2, 4]);
        assert_eq!(table.character_indexes(), &[3]);

        let mut all: Vec<usize> = table
            .rating_indexes()
            .iter()
            .chain(table.general_indexes())
            .chain(table.character_indexes())
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 5, "index sets must not overlap");
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_csv_parsing_with_extra_columns() {
        let table = table_from_csv(
            "tag_id,name,category,count\n\
             9999,general,9,100\n\
             12,1girl,0,5000000\n\
             77,hatsune_miku,4,300000\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.name(0), "general");
        assert_eq!(table.name(2), "hatsune miku");
        assert_eq!(table.rating_indexes(), &[0]);
        assert_eq!(table.general_indexes(), &[1]);
        assert_eq!(table.character_indexes(), &[2]);
    }

    #[test]
    fn test_csv_missing_column_rejected() {
        let err = table_from_csv("tag_id,name,count\n1,foo,2\n").unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_csv_bad_category_code_rejected() {
        let err = table_from_csv("name,category\nfoo,bar\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selected_tags.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "tag_id,name,category,count").unwrap();
        writeln!(f, "1,general,9,10").unwrap();
        writeln!(f, "2,long_hair,0,20").unwrap();

        let table = LabelTable::from_csv_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(1), "long hair");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = LabelTable::from_csv_file(Path::new("/nonexistent/tags.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tags.csv"));
    }
}

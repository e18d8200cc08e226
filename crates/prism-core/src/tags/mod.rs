//! Tag post-processing: category splitting and output formatting.
//!
//! Turns a raw confidence vector into per-category score lists, and
//! accepted score lists into the two output dialects.

pub mod format;
pub mod lexicon;
pub mod split;

pub use format::TagFormatter;
pub use lexicon::Lexicon;
pub use split::{split, CategoryScores};

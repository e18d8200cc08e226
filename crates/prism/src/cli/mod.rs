//! Command implementations for the Prism CLI.

pub mod config;
pub mod discover;
pub mod models;
pub mod tag;

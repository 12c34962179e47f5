//! Issue detection for dataset records.
//!
//! Deterministic checks (language, query execution) run first; the
//! model-driven semantic checks are advisory and run last.

pub mod detector;
pub mod issue;
pub mod language;

pub use detector::Detector;
pub use issue::IssueTag;
pub use language::only_latin_characters;

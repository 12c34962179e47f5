//! Issue tags attached to dataset records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One detected problem with a record.
///
/// Order of appearance on a record follows check order, not severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueTag {
    /// The query uses a deprecated feature that has a replacement.
    Deprecation,
    /// The query ran but the store reported no data.
    EmptyResult,
    /// The query failed to plan or execute.
    SyntaxError,
    /// The question contains characters outside the Latin allow-list.
    NonEnglishCharacters,
    /// The model judged the question vague.
    AmbiguousQuestion,
    /// The model judged that the query does not answer the question.
    InaccurateQuery,
}

impl IssueTag {
    /// Every tag, in declaration order.
    pub const ALL: [IssueTag; 6] = [
        Self::Deprecation,
        Self::EmptyResult,
        Self::SyntaxError,
        Self::NonEnglishCharacters,
        Self::AmbiguousQuestion,
        Self::InaccurateQuery,
    ];

    /// Returns the tag name as written to output files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deprecation => "deprecation",
            Self::EmptyResult => "empty_result",
            Self::SyntaxError => "syntax_error",
            Self::NonEnglishCharacters => "non_english_characters",
            Self::AmbiguousQuestion => "ambiguous_question",
            Self::InaccurateQuery => "inaccurate_query",
        }
    }
}

impl FromStr for IssueTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("Unknown issue tag: {}", s))
    }
}

impl fmt::Display for IssueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

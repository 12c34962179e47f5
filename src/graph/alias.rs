//! Known graph database sources referenced by the dataset.

use crate::error::{CleanupError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one of the Neo4j Labs demo databases.
///
/// The set is closed: any other value in the dataset's alias column is a
/// configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DatabaseAlias {
    Movies,
    Companies,
    Network,
    Recommendations,
    Bluesky,
    Buzzoverflow,
    Fincen,
    GameOfThrones,
    Grandstack,
    Neoflix,
    Northwind,
    OffshoreLeaks,
    OpenStreetMap,
    StackOverflow2,
    Twitch,
    Twitter,
    StackOverflow,
}

impl DatabaseAlias {
    /// Every known alias, in declaration order.
    pub const ALL: [DatabaseAlias; 17] = [
        Self::Movies,
        Self::Companies,
        Self::Network,
        Self::Recommendations,
        Self::Bluesky,
        Self::Buzzoverflow,
        Self::Fincen,
        Self::GameOfThrones,
        Self::Grandstack,
        Self::Neoflix,
        Self::Northwind,
        Self::OffshoreLeaks,
        Self::OpenStreetMap,
        Self::StackOverflow2,
        Self::Twitch,
        Self::Twitter,
        Self::StackOverflow,
    ];

    /// Returns the alias exactly as it appears in the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movies => "neo4jlabs_demo_db_movies",
            Self::Companies => "neo4jlabs_demo_db_companies",
            Self::Network => "neo4jlabs_demo_db_network",
            Self::Recommendations => "neo4jlabs_demo_db_recommendations",
            Self::Bluesky => "neo4jlabs_demo_db_bluesky",
            Self::Buzzoverflow => "neo4jlabs_demo_db_buzzoverflow",
            Self::Fincen => "neo4jlabs_demo_db_fincen",
            Self::GameOfThrones => "neo4jlabs_demo_db_gameofthrones",
            Self::Grandstack => "neo4jlabs_demo_db_grandstack",
            // The published dataset misspells this one.
            Self::Neoflix => "neo4jlabs_demo_db_eoflix",
            Self::Northwind => "neo4jlabs_demo_db_northwind",
            Self::OffshoreLeaks => "neo4jlabs_demo_db_offshoreleaks",
            Self::OpenStreetMap => "neo4jlabs_demo_db_openstreetmap",
            Self::StackOverflow2 => "neo4jlabs_demo_db_stackoverflow2",
            Self::Twitch => "neo4jlabs_demo_db_twitch",
            Self::Twitter => "neo4jlabs_demo_db_twitter",
            Self::StackOverflow => "neo4jlabs_demo_db_stackoverflow",
        }
    }

    /// Returns the database name on the demo server.
    ///
    /// Demo databases use the database name as both user name and password.
    pub fn database_name(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Companies => "companies",
            Self::Network => "network",
            Self::Recommendations => "recommendations",
            Self::Bluesky => "bluesky",
            Self::Buzzoverflow => "buzzoverflow",
            Self::Fincen => "fincen",
            Self::GameOfThrones => "gameofthrones",
            Self::Grandstack => "grandstack",
            Self::Neoflix => "neoflix",
            Self::Northwind => "northwind",
            Self::OffshoreLeaks => "offshoreleaks",
            Self::OpenStreetMap => "openstreetmap",
            Self::StackOverflow2 => "stackoverflow2",
            Self::Twitch => "twitch",
            Self::Twitter => "twitter",
            Self::StackOverflow => "stackoverflow",
        }
    }
}

impl FromStr for DatabaseAlias {
    type Err = CleanupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|alias| alias.as_str() == s)
            .ok_or_else(|| CleanupError::config(format!("Unknown database alias '{}'", s)))
    }
}

impl TryFrom<String> for DatabaseAlias {
    type Error = CleanupError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DatabaseAlias> for String {
    fn from(alias: DatabaseAlias) -> Self {
        alias.as_str().to_string()
    }
}

impl fmt::Display for DatabaseAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

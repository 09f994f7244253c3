//! Trivia categories served by `/trivia`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriviaCategory {
    Images,
    Bonus,
    Gen1,
    Gen2,
    Gen3,
    Gen4,
    Gen5,
    Gen6,
    Gen7,
}

#[derive(Debug, Error)]
#[error("unknown trivia category `{0}`")]
pub struct UnknownCategory(pub String);

impl TriviaCategory {
    /// Every category, in the order clients see them listed.
    pub const ALL: [TriviaCategory; 9] = [
        TriviaCategory::Images,
        TriviaCategory::Bonus,
        TriviaCategory::Gen1,
        TriviaCategory::Gen2,
        TriviaCategory::Gen3,
        TriviaCategory::Gen4,
        TriviaCategory::Gen5,
        TriviaCategory::Gen6,
        TriviaCategory::Gen7,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TriviaCategory::Images => "images",
            TriviaCategory::Bonus => "bonus",
            TriviaCategory::Gen1 => "gen1",
            TriviaCategory::Gen2 => "gen2",
            TriviaCategory::Gen3 => "gen3",
            TriviaCategory::Gen4 => "gen4",
            TriviaCategory::Gen5 => "gen5",
            TriviaCategory::Gen6 => "gen6",
            TriviaCategory::Gen7 => "gen7",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|category| category.as_str()).collect()
    }
}

impl FromStr for TriviaCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for TriviaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

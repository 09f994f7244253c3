//! In-memory trivia records.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::dataset::category::TriviaCategory;
use crate::dataset::DatasetError;

/// Category name → records, exactly as stored on disk.
///
/// Key order inside records is preserved so a served record matches its
/// source text field for field.
#[derive(Debug, Default)]
pub struct Dataset {
    categories: HashMap<String, Vec<Value>>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let categories = serde_json::from_str(content)?;
        Ok(Self { categories })
    }

    pub fn records(&self, category: TriviaCategory) -> &[Value] {
        self.categories
            .get(category.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn choose<R: Rng + ?Sized>(&self, category: TriviaCategory, rng: &mut R) -> Option<&Value> {
        self.records(category).choose(rng)
    }

    /// Categories the service knows about that have no records.
    pub fn missing_categories(&self) -> Vec<TriviaCategory> {
        TriviaCategory::ALL
            .into_iter()
            .filter(|category| self.records(*category).is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

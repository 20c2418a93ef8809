use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ConfigError;

/// Locations of the three YAML keyword/category files.
#[derive(Debug, Clone)]
pub struct KeywordPaths {
    /// File with the `negative_keywords` list.
    pub keywords: PathBuf,
    /// File with the `category_map` table (numeric code → label).
    pub category_map: PathBuf,
    /// File mapping each tourism keyword category to its word list.
    pub keyword_rules: PathBuf,
}

/// Keyword and category configuration, loaded once per process and passed
/// into the enricher.
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Videos whose title+description contain any of these are dropped.
    pub negative_keywords: Vec<String>,
    /// Numeric category code → human-readable label.
    pub category_map: BTreeMap<String, String>,
    /// Keyword category → word list; one boolean flag per category is
    /// computed for each enriched record.
    pub keyword_rules: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct KeywordsFile {
    negative_keywords: Vec<String>,
}

#[derive(Deserialize)]
struct CategoryMapFile {
    category_map: BTreeMap<String, String>,
}

impl KeywordConfig {
    /// Load and validate all three keyword files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any file cannot be read, parsed, or fails
    /// validation.
    pub fn load(paths: &KeywordPaths) -> Result<Self, ConfigError> {
        let keywords: KeywordsFile = read_yaml(&paths.keywords)?;
        let category_map: CategoryMapFile = read_yaml(&paths.category_map)?;
        let keyword_rules: BTreeMap<String, Vec<String>> = read_yaml(&paths.keyword_rules)?;

        let config = Self {
            negative_keywords: keywords.negative_keywords,
            category_map: category_map.category_map,
            keyword_rules,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.negative_keywords.iter().any(|w| w.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "negative_keywords must not contain empty entries".to_string(),
            ));
        }
        for (category, words) in &self.keyword_rules {
            if category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "keyword rule category names must be non-empty".to_string(),
                ));
            }
            if words.is_empty() || words.iter().any(|w| w.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "keyword rule '{category}' must have a non-empty word list"
                )));
            }
        }
        Ok(())
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

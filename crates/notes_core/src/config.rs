//! Store configuration.
//!
//! # Responsibility
//! - Name the persisted keys for notes, categories and the auth stub.
//! - Define the category seed and the cascade fallback category.
//!
//! # Invariants
//! - All four keys are non-empty and pairwise distinct.
//! - `seed_categories` contains `fallback_category` and has no duplicates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_NOTES_KEY: &str = "notesapp_notes";
pub const DEFAULT_CATEGORIES_KEY: &str = "notesapp_categories";
pub const DEFAULT_USER_KEY: &str = "notesapp_user";
pub const DEFAULT_TOKEN_KEY: &str = "notesapp_token";
pub const DEFAULT_FALLBACK_CATEGORY: &str = "General";
pub const DEFAULT_SEED_CATEGORIES: [&str; 3] = ["General", "Work", "Ideas"];

/// Configuration errors reported by [`StoreConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyKey(&'static str),
    DuplicateKey(String),
    DuplicateSeedCategory(String),
    FallbackNotSeeded(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey(field) => write!(f, "config field `{field}` cannot be empty"),
            Self::DuplicateKey(key) => write!(f, "persisted key `{key}` is used twice"),
            Self::DuplicateSeedCategory(name) => {
                write!(f, "seed category `{name}` is listed twice")
            }
            Self::FallbackNotSeeded(name) => {
                write!(f, "fallback category `{name}` is missing from the seed")
            }
        }
    }
}

impl Error for ConfigError {}

/// Persisted layout and category defaults shared by all stores of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub notes_key: String,
    pub categories_key: String,
    pub user_key: String,
    pub token_key: String,
    /// Target of cascade reassignment when a category is deleted.
    pub fallback_category: String,
    /// Category list used when nothing (or nothing readable) is persisted.
    pub seed_categories: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notes_key: DEFAULT_NOTES_KEY.to_string(),
            categories_key: DEFAULT_CATEGORIES_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
            seed_categories: DEFAULT_SEED_CATEGORIES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

impl StoreConfig {
    /// Checks key and seed invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            ("notes_key", &self.notes_key),
            ("categories_key", &self.categories_key),
            ("user_key", &self.user_key),
            ("token_key", &self.token_key),
        ];
        let mut seen = BTreeSet::new();
        for (field, key) in keys {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey(field));
            }
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateKey(key.clone()));
            }
        }

        if self.fallback_category.is_empty() {
            return Err(ConfigError::EmptyKey("fallback_category"));
        }

        let mut names = BTreeSet::new();
        for name in &self.seed_categories {
            if !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateSeedCategory(name.clone()));
            }
        }
        if !names.contains(self.fallback_category.as_str()) {
            return Err(ConfigError::FallbackNotSeeded(
                self.fallback_category.clone(),
            ));
        }

        Ok(())
    }
}

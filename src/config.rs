use crate::categorize::{Categorizer, Rule, DEFAULT_CATEGORY};
use log::info;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// On-disk rule set. Rules are an array of tables so TOML keeps their order:
///
/// ```toml
/// default = "Other"
///
/// [[rules]]
/// keyword = "rent"
/// category = "Housing"
/// ```
#[derive(Deserialize, Debug)]
pub(crate) struct RulesConfig {
    default: Option<String>,
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Deserialize, Debug)]
struct RuleEntry {
    keyword: String,
    category: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read rules file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid rules file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Rule #{0} has an empty keyword")]
    EmptyKeyword(usize),
}

impl RulesConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = toml::from_str(text)?;
        // An empty keyword is a substring of everything and would shadow every later rule.
        if let Some(pos) = config.rules.iter().position(|r| r.keyword.trim().is_empty()) {
            return Err(ConfigError::EmptyKeyword(pos + 1));
        }
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&text)?;
        info!("Loaded {} rules from {}", config.rules.len(), path.display());
        Ok(config)
    }

    pub fn into_categorizer(self) -> Categorizer {
        let rules = self
            .rules
            .iter()
            .map(|r| Rule::new(r.keyword.trim(), r.category.trim()))
            .collect();
        Categorizer::new(rules, self.default.as_deref().unwrap_or(DEFAULT_CATEGORY))
    }
}

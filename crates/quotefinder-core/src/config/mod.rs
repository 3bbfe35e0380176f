//! Configuration management

use crate::error::{QuoteFinderError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search pipeline tuning
    #[serde(default)]
    pub search: SearchConfig,

    /// Speakers accepted as a search filter
    #[serde(default = "default_speakers")]
    pub speakers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            speakers: default_speakers(),
        }
    }
}

/// Ranking and fallback thresholds for the search pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results when the caller does not ask for a specific count
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Texts at or above this many characters are skipped by the exact-match lookup
    #[serde(default = "default_exact_match_max_chars")]
    pub exact_match_max_chars: usize,

    /// Spelling candidates requested per fallback tier
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Minimum confidence to auto-correct a distance-1 suggestion
    #[serde(default = "default_auto_accept_confidence")]
    pub auto_accept_confidence: f64,

    /// Minimum confidence to auto-correct a distance-2 suggestion
    #[serde(default = "default_distance_two_confidence")]
    pub distance_two_confidence: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            exact_match_max_chars: default_exact_match_max_chars(),
            max_suggestions: default_max_suggestions(),
            auto_accept_confidence: default_auto_accept_confidence(),
            distance_two_confidence: default_distance_two_confidence(),
        }
    }
}

fn default_speakers() -> Vec<String> {
    vec!["ricky".to_string(), "steve".to_string(), "karl".to_string()]
}

fn default_top_k() -> usize {
    5
}

fn default_exact_match_max_chars() -> usize {
    100
}

fn default_max_suggestions() -> usize {
    3
}

fn default_auto_accept_confidence() -> f64 {
    0.75
}

fn default_distance_two_confidence() -> f64 {
    0.8
}

impl Config {
    /// Load config from the default path, or defaults when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config path (QUOTEFINDER_CONFIG overrides)
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("QUOTEFINDER_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Reject values the search pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        if search.default_top_k == 0 {
            return Err(QuoteFinderError::Config(
                "search.default_top_k must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("search.auto_accept_confidence", search.auto_accept_confidence),
            ("search.distance_two_confidence", search.distance_two_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(QuoteFinderError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Resolve a speaker filter against the configured speakers.
    ///
    /// Returns the lowercased speaker, or `None` if it is not allowed.
    pub fn resolve_speaker(&self, speaker: &str) -> Option<String> {
        let lower = speaker.trim().to_lowercase();
        self.speakers
            .iter()
            .any(|s| s.to_lowercase() == lower)
            .then_some(lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.default_top_k, 5);
        assert_eq!(config.search.exact_match_max_chars, 100);
        assert_eq!(config.search.max_suggestions, 3);
        assert_eq!(config.speakers, vec!["ricky", "steve", "karl"]);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "search:\n  exact_match_max_chars: 250\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.search.exact_match_max_chars, 250);
        assert_eq!(config.search.auto_accept_confidence, 0.75);
        assert_eq!(config.speakers.len(), 3);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("nope.yml")).unwrap();
        assert_eq!(config.search.distance_two_confidence, 0.8);
    }

    #[test]
    fn test_load_rejects_out_of_range_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        std::fs::write(&path, "search:\n  auto_accept_confidence: 1.5\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, QuoteFinderError::Config(_)));
        assert_eq!(err.exit_code(), crate::error::exit_codes::INVALID_INPUT);

        std::fs::write(&path, "search:\n  default_top_k: 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            QuoteFinderError::Config(_)
        ));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "search: [unclosed\n").unwrap();
        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            QuoteFinderError::Yaml(_)
        ));
    }

    #[test]
    fn test_resolve_speaker() {
        let config = Config::default();
        assert_eq!(config.resolve_speaker("Karl"), Some("karl".to_string()));
        assert_eq!(config.resolve_speaker("suzanne"), None);
    }
}

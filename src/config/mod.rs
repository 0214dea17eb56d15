//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::{RankingSystem, ScoringRules};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Tie-break criteria used when a tournament configures none
    #[serde(default = "default_criteria")]
    pub criteria: Vec<RankingSystem>,
}

fn default_criteria() -> Vec<RankingSystem> {
    vec![RankingSystem::Wins, RankingSystem::BlackTimes]
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            criteria: default_criteria(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Point values for new tournaments
    #[serde(default)]
    pub scoring: ScoringRules,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scoring: ScoringRules::default(),
            ranking: RankingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        if !(s.win_points.is_finite() && s.draw_points.is_finite() && s.lose_points.is_finite()) {
            return Err(ConfigError::ValidationError(
                "Point values must be finite".to_string(),
            ));
        }

        if s.win_points < s.draw_points || s.draw_points < s.lose_points {
            return Err(ConfigError::ValidationError(format!(
                "Points must satisfy win >= draw >= lose (got {} / {} / {})",
                s.win_points, s.draw_points, s.lose_points
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.scoring.win_points, 1.0);
        assert_eq!(config.scoring.draw_points, 0.5);
        assert_eq!(config.scoring.lose_points, 0.0);
        assert_eq!(
            config.ranking.criteria,
            vec![RankingSystem::Wins, RankingSystem::BlackTimes]
        );
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_order() {
        let mut config = AppConfig::default();
        config.scoring.draw_points = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_not_finite() {
        let mut config = AppConfig::default();
        config.scoring.win_points = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.scoring, parsed.scoring);
        assert_eq!(config.ranking.criteria, parsed.ranking.criteria);
    }

    #[test]
    fn test_config_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
log_level = "debug"

[scoring]
win_points = 3.0
draw_points = 1.0

[ranking]
criteria = ["buchholz", "sonneborn_berger"]

[output]
format = "json"
"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.scoring.win_points, 3.0);
        assert_eq!(config.scoring.lose_points, 0.0);
        assert_eq!(
            config.ranking.criteria,
            vec![RankingSystem::Buchholz, RankingSystem::SonnebornBerger]
        );
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_unknown_criterion_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[ranking]\ncriteria = [\"median\"]\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }
}

//! Session configuration loaded from TOML.

use std::{fs, io, path::PathBuf};

use dodge_core::GameLevel;
use dodge_world::{BoardConfig, DEFAULT_COLS, DEFAULT_ROWS};
use serde::Deserialize;
use thiserror::Error;

/// Enemies created by a default session.
pub const DEFAULT_ENEMIES: u32 = 10;

/// Obstacles created by a default session.
pub const DEFAULT_OBSTACLES: u32 = 4;

/// How entities reach their initial positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// The session places every entity as soon as it starts.
    #[default]
    Immediate,
    /// The presentation layer places entities one at a time once their
    /// footprints are known.
    Deferred,
}

/// Settings of a single game.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of grid rows.
    pub rows: i32,
    /// Number of grid columns.
    pub cols: i32,
    /// Difficulty level.
    pub level: GameLevel,
    /// Enemies created on start.
    pub enemies: u32,
    /// Obstacles created on start.
    pub obstacles: u32,
    /// Seed of the board's random generator.
    pub seed: u64,
    /// Lower bound on following enemies.
    pub min_following: u32,
    /// Upper bound on following enemies.
    pub max_following: u32,
    /// Placement strategy.
    pub placement: PlacementMode,
}

impl Default for Config {
    fn default() -> Self {
        let board = BoardConfig::default();
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            level: GameLevel::default(),
            enemies: DEFAULT_ENEMIES,
            obstacles: DEFAULT_OBSTACLES,
            seed: board.seed,
            min_following: board.min_following,
            max_following: board.max_following,
            placement: PlacementMode::default(),
        }
    }
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config at {}", path.display())]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The contents are not valid TOML for this schema.
    #[error("failed to parse config toml contents")]
    Parse(#[from] toml::de::Error),
    /// The values are individually valid but inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Parses a configuration, filling absent fields with defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the configuration at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml(&contents)
    }

    /// Checks the relations between fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(ConfigError::Invalid(format!(
                "board must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.min_following > self.max_following {
            return Err(ConfigError::Invalid(format!(
                "min_following {} exceeds max_following {}",
                self.min_following, self.max_following
            )));
        }
        Ok(())
    }

    /// Board parameters derived from this configuration.
    #[must_use]
    pub fn board(&self) -> BoardConfig {
        BoardConfig {
            rows: self.rows,
            cols: self.cols,
            level: self.level,
            seed: self.seed,
            min_following: self.min_following,
            max_following: self.max_following,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!((config.rows, config.cols), (52, 100));
        assert_eq!((config.enemies, config.obstacles), (10, 4));
        assert_eq!((config.min_following, config.max_following), (6, 8));
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = Config::from_toml(
            r#"
            rows = 20
            level = "Expert"
            placement = "deferred"
            "#,
        )
        .expect("parse");
        assert_eq!(config.rows, 20);
        assert_eq!(config.cols, 100);
        assert_eq!(config.level, GameLevel::Expert);
        assert_eq!(config.placement, PlacementMode::Deferred);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Config::from_toml("speed = 3").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_following_bounds_are_rejected() {
        let error = Config::from_toml("min_following = 9\nmax_following = 2").expect_err("bounds");
        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = Config::load("/nonexistent/dodge.toml").expect_err("missing");
        assert!(error.to_string().contains("/nonexistent/dodge.toml"));
    }
}

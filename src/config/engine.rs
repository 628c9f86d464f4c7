//! Main engine configuration
//!
//! This module defines the top-level configuration for the rating engine,
//! including environment variable loading, TOML file loading, and validation.

use crate::config::rating::RatingConfig;
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// How standings ties on the ranking score are broken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ascending team name (default)
    TeamName,
    /// Descending matches played, then team name
    MatchesPlayed,
}

impl std::str::FromStr for TieBreak {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "team_name" | "name" => Ok(TieBreak::TeamName),
            "matches_played" | "matches" => Ok(TieBreak::MatchesPlayed),
            other => Err(RatingError::ConfigurationError {
                message: format!("unknown tie break: {}", other),
            }
            .into()),
        }
    }
}

/// How the engine treats an appended match that predates already-applied ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetroactivePolicy {
    /// Fail with `OutOfOrderMatch`; the caller must re-load the league (default)
    Reject,
    /// Splice the match into the history and rebuild the league by full replay
    Reconcile,
}

impl std::str::FromStr for RetroactivePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(RetroactivePolicy::Reject),
            "reconcile" => Ok(RetroactivePolicy::Reconcile),
            other => Err(RatingError::ConfigurationError {
                message: format!("unknown retroactive policy: {}", other),
            }
            .into()),
        }
    }
}

/// Standings query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSettings {
    /// Multiple of uncertainty subtracted from the rating to form the
    /// conservative ranking score
    pub conservative_multiplier: f64,
    /// Declared deterministic tie break
    pub tie_break: TieBreak,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            conservative_multiplier: 3.0,
            tie_break: TieBreak::TeamName,
        }
    }
}

/// Replay and append settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySettings {
    pub retroactive: RetroactivePolicy,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            retroactive: RetroactivePolicy::Reject,
        }
    }
}

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub rating: RatingConfig,
    pub ranking: RankingSettings,
    pub replay: ReplaySettings,
}

impl EngineConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(k) = env::var("ELO_K_FACTOR") {
            config.rating.elo.k_factor = k
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid ELO_K_FACTOR value: {}", k))?;
        }
        if let Ok(initial) = env::var("ELO_INITIAL_RATING") {
            config.rating.elo.initial_rating = initial
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid ELO_INITIAL_RATING value: {}", initial))?;
        }
        if let Ok(beta) = env::var("WENG_LIN_BETA") {
            config.rating.weng_lin.beta = beta
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid WENG_LIN_BETA value: {}", beta))?;
        }
        if let Ok(sigma) = env::var("WENG_LIN_INITIAL_UNCERTAINTY") {
            config.rating.weng_lin.initial_uncertainty = sigma.parse().map_err(|_| {
                anyhow::anyhow!("Invalid WENG_LIN_INITIAL_UNCERTAINTY value: {}", sigma)
            })?;
        }
        if let Ok(tolerance) = env::var("WENG_LIN_UNCERTAINTY_TOLERANCE") {
            config.rating.weng_lin.uncertainty_tolerance = tolerance.parse().map_err(|_| {
                anyhow::anyhow!("Invalid WENG_LIN_UNCERTAINTY_TOLERANCE value: {}", tolerance)
            })?;
        }
        if let Ok(multiplier) = env::var("CONSERVATIVE_MULTIPLIER") {
            config.ranking.conservative_multiplier = multiplier.parse().map_err(|_| {
                anyhow::anyhow!("Invalid CONSERVATIVE_MULTIPLIER value: {}", multiplier)
            })?;
        }
        if let Ok(tie_break) = env::var("TIE_BREAK") {
            config.ranking.tie_break = tie_break.parse()?;
        }
        if let Ok(policy) = env::var("RETROACTIVE_POLICY") {
            config.replay.retroactive = policy.parse()?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e)
        })?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    config.rating.validate()?;

    if !config.ranking.conservative_multiplier.is_finite()
        || config.ranking.conservative_multiplier < 0.0
    {
        return Err(RatingError::ConfigurationError {
            message: "Conservative multiplier must be non-negative".to_string(),
        }
        .into());
    }

    Ok(())
}

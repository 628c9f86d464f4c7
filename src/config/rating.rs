//! Rating algorithm configuration
//!
//! Settings for the two rating model families. Defaults follow each
//! algorithm's own convention: 1500-based scores for Elo, the 25-based
//! (mu, sigma) scale for Weng-Lin.

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::WengLinConfig;

/// Settings for the Elo rating model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloSettings {
    /// K-factor applied uniformly to every match
    pub k_factor: f64,
    /// Rating assigned to teams before their first match
    pub initial_rating: f64,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1500.0,
        }
    }
}

impl EloSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: format!("Elo k-factor must be positive, got {}", self.k_factor),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Elo initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Settings for the Weng-Lin (OpenSkill) rating model
///
/// Wraps the skillratings `WengLinConfig` parameters together with the
/// initial (mu, sigma) assigned to new teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WengLinSettings {
    /// Initial skill mean for new teams
    pub initial_rating: f64,
    /// Initial skill uncertainty for new teams
    pub initial_uncertainty: f64,
    /// Performance variance parameter (beta)
    pub beta: f64,
    /// Lower bound factor on uncertainty shrinkage; must stay positive so
    /// sigma never collapses to zero
    pub uncertainty_tolerance: f64,
}

impl Default for WengLinSettings {
    fn default() -> Self {
        Self {
            initial_rating: 25.0,
            initial_uncertainty: 25.0 / 3.0,
            beta: 25.0 / 6.0,
            uncertainty_tolerance: 0.000_001,
        }
    }
}

impl WengLinSettings {
    /// Core Weng-Lin parameters in the shape skillratings expects
    pub fn model_config(&self) -> WengLinConfig {
        WengLinConfig {
            beta: self.beta,
            uncertainty_tolerance: self.uncertainty_tolerance,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: format!("beta must be positive, got {}", self.beta),
            }
            .into());
        }

        if !self.uncertainty_tolerance.is_finite() || self.uncertainty_tolerance <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "uncertainty tolerance must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_uncertainty.is_finite() || self.initial_uncertainty <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "initial uncertainty must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Combined settings for all rating model families
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingConfig {
    pub elo: EloSettings,
    pub weng_lin: WengLinSettings,
}

impl RatingConfig {
    /// Validate all model settings
    pub fn validate(&self) -> Result<()> {
        self.elo.validate()?;
        self.weng_lin.validate()?;
        Ok(())
    }
}

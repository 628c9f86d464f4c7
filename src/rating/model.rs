//! Rating model trait and factory
//!
//! This module defines the interface all rating algorithms implement: a
//! stateless transform from current ratings plus one match outcome to
//! updated ratings.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::types::{Algorithm, MatchDecision, TeamRating};
use skillratings::Outcomes;

/// Trait for rating update algorithms
///
/// Implementations are stateless: the engine owns the rating state and calls
/// `rate` once per replayed match.
pub trait RatingModel: Send + Sync {
    /// Which algorithm family this model belongs to
    fn algorithm(&self) -> Algorithm;

    /// Rating assigned to a team before its first match
    fn initial_rating(&self) -> TeamRating;

    /// Apply one match outcome to the two participants' ratings
    ///
    /// Returns the updated (home, away) pair. Fails with `InvalidOutcome` if
    /// the inputs are malformed.
    fn rate(
        &self,
        home: &TeamRating,
        away: &TeamRating,
        decision: MatchDecision,
    ) -> Result<(TeamRating, TeamRating)>;

    /// Expected probability that the home side wins
    fn expected_score(&self, home: &TeamRating, away: &TeamRating) -> f64;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> Result<()>;
}

/// Build the model for the given algorithm tag
///
/// Validates the relevant settings before constructing the variant.
pub fn build_model(algorithm: Algorithm, config: &RatingConfig) -> Result<Box<dyn RatingModel>> {
    match algorithm {
        Algorithm::Elo => Ok(Box::new(crate::rating::elo::EloModel::new(
            config.elo.clone(),
        )?)),
        Algorithm::OpenSkill => Ok(Box::new(crate::rating::weng_lin::WengLinModel::new(
            config.weng_lin.clone(),
        )?)),
    }
}

/// Map a match decision to the skillratings outcome, home perspective
pub(crate) fn to_outcome(decision: MatchDecision) -> Outcomes {
    match decision {
        MatchDecision::HomeWin => Outcomes::WIN,
        MatchDecision::AwayWin => Outcomes::LOSS,
        MatchDecision::Draw => Outcomes::DRAW,
    }
}

/// Reject non-finite rating inputs before handing them to skillratings
pub(crate) fn check_finite(home: &TeamRating, away: &TeamRating) -> Result<()> {
    for rating in [home, away] {
        if !rating.rating.is_finite() || !rating.uncertainty.is_finite() {
            return Err(RatingError::InvalidOutcome {
                reason: format!("non-finite rating state: {:?}", rating),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_both_variants() {
        let config = RatingConfig::default();

        let elo = build_model(Algorithm::Elo, &config).unwrap();
        assert_eq!(elo.algorithm(), Algorithm::Elo);
        assert_eq!(elo.initial_rating().rating, 1500.0);

        let openskill = build_model(Algorithm::OpenSkill, &config).unwrap();
        assert_eq!(openskill.algorithm(), Algorithm::OpenSkill);
        assert_eq!(openskill.initial_rating().rating, 25.0);
    }

    #[test]
    fn test_factory_rejects_invalid_settings() {
        let mut config = RatingConfig::default();
        config.elo.k_factor = -1.0;
        assert!(build_model(Algorithm::Elo, &config).is_err());

        let mut config = RatingConfig::default();
        config.weng_lin.uncertainty_tolerance = 0.0;
        assert!(build_model(Algorithm::OpenSkill, &config).is_err());
    }

    #[test]
    fn test_non_finite_ratings_rejected() {
        let good = TeamRating {
            rating: 1500.0,
            uncertainty: 0.0,
        };
        let bad = TeamRating {
            rating: f64::NAN,
            uncertainty: 0.0,
        };
        assert!(check_finite(&good, &good).is_ok());
        assert!(check_finite(&good, &bad).is_err());
    }
}

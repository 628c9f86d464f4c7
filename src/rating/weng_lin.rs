//! Weng-Lin (OpenSkill) rating model implementation
//!
//! This module provides a concrete implementation of the rating model
//! using the Weng-Lin algorithm from the skillratings crate. Each team is
//! modeled as a (mu, sigma) pair; sigma only ever shrinks, down to the
//! positive floor set by the uncertainty tolerance.

use crate::config::WengLinSettings;
use crate::error::Result;
use crate::rating::model::{check_finite, to_outcome, RatingModel};
use crate::types::{Algorithm, MatchDecision, TeamRating};
use skillratings::weng_lin::{expected_score, weng_lin, WengLinRating};

/// Weng-Lin rating model
#[derive(Debug)]
pub struct WengLinModel {
    settings: WengLinSettings,
}

impl WengLinModel {
    /// Create a new Weng-Lin model
    pub fn new(settings: WengLinSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self { settings })
    }
}

impl RatingModel for WengLinModel {
    fn algorithm(&self) -> Algorithm {
        Algorithm::OpenSkill
    }

    fn initial_rating(&self) -> TeamRating {
        TeamRating {
            rating: self.settings.initial_rating,
            uncertainty: self.settings.initial_uncertainty,
        }
    }

    fn rate(
        &self,
        home: &TeamRating,
        away: &TeamRating,
        decision: MatchDecision,
    ) -> Result<(TeamRating, TeamRating)> {
        check_finite(home, away)?;

        let home_rating: WengLinRating = (*home).into();
        let away_rating: WengLinRating = (*away).into();

        let (new_home, new_away) = weng_lin(
            &home_rating,
            &away_rating,
            &to_outcome(decision),
            &self.settings.model_config(),
        );

        Ok((new_home.into(), new_away.into()))
    }

    fn expected_score(&self, home: &TeamRating, away: &TeamRating) -> f64 {
        let home_rating: WengLinRating = (*home).into();
        let away_rating: WengLinRating = (*away).into();

        let (exp_home, _exp_away) =
            expected_score(&home_rating, &away_rating, &self.settings.model_config());
        exp_home
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.settings).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let settings: WengLinSettings = serde_json::from_value(config).map_err(|e| {
            crate::error::RatingError::ConfigurationError {
                message: format!("Invalid Weng-Lin configuration: {}", e),
            }
        })?;

        settings.validate()?;
        self.settings = settings;
        Ok(())
    }
}

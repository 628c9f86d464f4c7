//! Elo rating model implementation
//!
//! Pairwise scalar ratings from the skillratings crate: expected score
//! E_a = 1 / (1 + 10^((R_b - R_a)/400)), update R_a' = R_a + K * (S_a - E_a).
//! The update is zero-sum between the two sides.

use crate::config::EloSettings;
use crate::error::Result;
use crate::rating::model::{check_finite, to_outcome, RatingModel};
use crate::types::{Algorithm, MatchDecision, TeamRating};
use skillratings::elo::{elo, expected_score, EloConfig, EloRating};

/// Elo rating model with a fixed K-factor
#[derive(Debug)]
pub struct EloModel {
    settings: EloSettings,
}

impl EloModel {
    /// Create a new Elo model
    pub fn new(settings: EloSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self { settings })
    }

    fn model_config(&self) -> EloConfig {
        EloConfig {
            k: self.settings.k_factor,
        }
    }
}

impl RatingModel for EloModel {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Elo
    }

    fn initial_rating(&self) -> TeamRating {
        TeamRating {
            rating: self.settings.initial_rating,
            uncertainty: 0.0,
        }
    }

    fn rate(
        &self,
        home: &TeamRating,
        away: &TeamRating,
        decision: MatchDecision,
    ) -> Result<(TeamRating, TeamRating)> {
        check_finite(home, away)?;

        let home_elo = EloRating {
            rating: home.rating,
        };
        let away_elo = EloRating {
            rating: away.rating,
        };

        let (new_home, new_away) = elo(
            &home_elo,
            &away_elo,
            &to_outcome(decision),
            &self.model_config(),
        );

        // Elo carries no uncertainty; the field stays at whatever it was.
        Ok((
            TeamRating {
                rating: new_home.rating,
                uncertainty: home.uncertainty,
            },
            TeamRating {
                rating: new_away.rating,
                uncertainty: away.uncertainty,
            },
        ))
    }

    fn expected_score(&self, home: &TeamRating, away: &TeamRating) -> f64 {
        let home_elo = EloRating {
            rating: home.rating,
        };
        let away_elo = EloRating {
            rating: away.rating,
        };
        let (exp_home, _exp_away) = expected_score(&home_elo, &away_elo);
        exp_home
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "k_factor": self.settings.k_factor,
            "initial_rating": self.settings.initial_rating,
        })
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let mut settings = self.settings.clone();
        if let Some(k) = config.get("k_factor").and_then(|v| v.as_f64()) {
            settings.k_factor = k;
        }
        if let Some(initial) = config.get("initial_rating").and_then(|v| v.as_f64()) {
            settings.initial_rating = initial;
        }

        settings.validate()?;
        self.settings = settings;
        Ok(())
    }
}

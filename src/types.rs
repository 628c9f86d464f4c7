//! Common types used throughout the rating engine

use crate::error::{RatingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::WengLinRating;
use uuid::Uuid;

/// Unique identifier for leagues
pub type LeagueId = String;

/// Unique identifier for teams
pub type TeamId = String;

/// Unique identifier for matches
pub type MatchId = Uuid;

/// Rating algorithm families supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Elo,
    OpenSkill,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Elo => write!(f, "elo"),
            Algorithm::OpenSkill => write!(f, "openskill"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "elo" => Ok(Algorithm::Elo),
            "openskill" | "weng-lin" | "weng_lin" => Ok(Algorithm::OpenSkill),
            other => Err(RatingError::ConfigurationError {
                message: format!("unknown rating algorithm: {}", other),
            }
            .into()),
        }
    }
}

/// A team and the league it competes in
///
/// League membership is fixed when the team is first seen and is not
/// reassignable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: TeamId,
    pub league: LeagueId,
}

impl Team {
    pub fn new(name: impl Into<TeamId>, league: impl Into<LeagueId>) -> Self {
        Self {
            name: name.into(),
            league: league.into(),
        }
    }
}

/// Resolved outcome of a match, from the home side's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchDecision {
    HomeWin,
    AwayWin,
    Draw,
}

/// Recorded result of a match
///
/// Either a full scoreline or an abstract decision label. Scores are signed
/// so that malformed input can be detected and rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Score { home: i32, away: i32 },
    Decision(MatchDecision),
}

impl MatchResult {
    /// Resolve the result to a decision label
    ///
    /// Fails with `InvalidOutcome` if the underlying data is malformed.
    pub fn decision(&self) -> Result<MatchDecision> {
        match *self {
            MatchResult::Score { home, away } => {
                if home < 0 || away < 0 {
                    return Err(RatingError::InvalidOutcome {
                        reason: format!("negative score {}-{}", home, away),
                    }
                    .into());
                }
                Ok(match home.cmp(&away) {
                    std::cmp::Ordering::Greater => MatchDecision::HomeWin,
                    std::cmp::Ordering::Less => MatchDecision::AwayWin,
                    std::cmp::Ordering::Equal => MatchDecision::Draw,
                })
            }
            MatchResult::Decision(decision) => Ok(decision),
        }
    }
}

/// A single recorded match between two teams in a league
///
/// Immutable once recorded. `played_at` establishes replay order; `id` breaks
/// timestamp ties so replay stays reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub league: LeagueId,
    pub home: TeamId,
    pub away: TeamId,
    pub result: MatchResult,
    pub played_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Replay ordering key: chronological with the match id as tiebreak
    pub fn replay_key(&self) -> (DateTime<Utc>, MatchId) {
        (self.played_at, self.id)
    }
}

/// Rating state for a team
///
/// One uniform shape for both algorithm families: Elo uses the scalar and
/// pins `uncertainty` at 0.0, Weng-Lin carries (mu, sigma) in the two fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub rating: f64,
    pub uncertainty: f64,
}

impl From<WengLinRating> for TeamRating {
    fn from(rating: WengLinRating) -> Self {
        Self {
            rating: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

impl From<TeamRating> for WengLinRating {
    fn from(rating: TeamRating) -> Self {
        Self {
            rating: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

/// A team's rating immediately after one applied match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub match_id: MatchId,
    pub played_at: DateTime<Utc>,
    pub rating: TeamRating,
}

/// Engine-owned rating state for a (league, team) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub team: TeamId,
    pub rating: TeamRating,
    pub matches_played: u64,
    pub last_played: Option<DateTime<Utc>>,
    /// Rating after each applied match, in replay order
    pub history: Vec<RatingSnapshot>,
}

impl TeamEntry {
    /// Create a fresh entry for a team that has not played yet
    pub fn new(team: TeamId, initial_rating: TeamRating) -> Self {
        Self {
            team,
            rating: initial_rating,
            matches_played: 0,
            last_played: None,
            history: Vec::new(),
        }
    }

    /// Record the rating produced by one applied match
    pub fn apply_match(&mut self, match_id: MatchId, played_at: DateTime<Utc>, rating: TeamRating) {
        self.rating = rating;
        self.matches_played += 1;
        self.last_played = Some(played_at);
        self.history.push(RatingSnapshot {
            match_id,
            played_at,
            rating,
        });
    }
}

/// One row of a standings query: derived, read-only, recomputed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position in the standings
    pub rank: u32,
    pub team: TeamId,
    pub rating: TeamRating,
    /// The sort key actually used: rating minus the configured multiple of uncertainty
    pub ranking_score: f64,
    pub matches_played: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_resolves_to_decision() {
        let win = MatchResult::Score { home: 3, away: 1 };
        let loss = MatchResult::Score { home: 0, away: 2 };
        let draw = MatchResult::Score { home: 1, away: 1 };

        assert_eq!(win.decision().unwrap(), MatchDecision::HomeWin);
        assert_eq!(loss.decision().unwrap(), MatchDecision::AwayWin);
        assert_eq!(draw.decision().unwrap(), MatchDecision::Draw);
    }

    #[test]
    fn test_negative_score_is_invalid() {
        let result = MatchResult::Score { home: -1, away: 2 };
        let err = result.decision().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidOutcome { .. })
        ));
    }

    #[test]
    fn test_decision_label_passes_through() {
        let result = MatchResult::Decision(MatchDecision::Draw);
        assert_eq!(result.decision().unwrap(), MatchDecision::Draw);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("elo".parse::<Algorithm>().unwrap(), Algorithm::Elo);
        assert_eq!(
            "openskill".parse::<Algorithm>().unwrap(),
            Algorithm::OpenSkill
        );
        assert_eq!(
            "weng-lin".parse::<Algorithm>().unwrap(),
            Algorithm::OpenSkill
        );
        assert!("glicko".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_team_entry_tracks_history() {
        let initial = TeamRating {
            rating: 1500.0,
            uncertainty: 0.0,
        };
        let mut entry = TeamEntry::new("Arsenal".to_string(), initial);
        assert_eq!(entry.matches_played, 0);
        assert!(entry.last_played.is_none());

        let played_at = Utc::now();
        let updated = TeamRating {
            rating: 1516.0,
            uncertainty: 0.0,
        };
        entry.apply_match(Uuid::new_v4(), played_at, updated);

        assert_eq!(entry.matches_played, 1);
        assert_eq!(entry.rating, updated);
        assert_eq!(entry.last_played, Some(played_at));
        assert_eq!(entry.history.len(), 1);
        assert_eq!(entry.history[0].rating, updated);
    }
}

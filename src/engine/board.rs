//! Per-league rating state
//!
//! A `LeagueBoard` owns the rating entries for one league together with the
//! ordered history of matches that produced them. Boards are built by replay
//! and mutated one match at a time; the engine swaps whole boards to keep
//! failures atomic.

use crate::error::{RatingError, Result};
use crate::rating::RatingModel;
use crate::types::{
    Algorithm, LeagueId, MatchDecision, MatchId, MatchRecord, TeamEntry, TeamId,
};
use std::collections::{HashMap, HashSet};

/// Rating state for a single league
pub struct LeagueBoard {
    league: LeagueId,
    algorithm: Algorithm,
    model: Box<dyn RatingModel>,
    teams: HashMap<TeamId, TeamEntry>,
    /// Applied matches in replay order; retained for cutoff queries and
    /// reconcile rebuilds
    applied: Vec<MatchRecord>,
    applied_ids: HashSet<MatchId>,
}

impl LeagueBoard {
    /// Create an empty board for a league
    pub fn new(league: LeagueId, algorithm: Algorithm, model: Box<dyn RatingModel>) -> Self {
        Self {
            league,
            algorithm,
            model,
            teams: HashMap::new(),
            applied: Vec::new(),
            applied_ids: HashSet::new(),
        }
    }

    /// Build a board by replaying `records`, which must already be in replay
    /// order
    pub fn replay(
        league: LeagueId,
        algorithm: Algorithm,
        model: Box<dyn RatingModel>,
        records: Vec<MatchRecord>,
    ) -> Result<Self> {
        let mut board = Self::new(league, algorithm, model);
        for record in records {
            board.apply(record)?;
        }
        Ok(board)
    }

    pub fn league(&self) -> &LeagueId {
        &self.league
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of matches applied so far
    pub fn match_count(&self) -> usize {
        self.applied.len()
    }

    /// Number of teams that have appeared in applied matches
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// The applied matches in replay order
    pub fn applied(&self) -> &[MatchRecord] {
        &self.applied
    }

    /// Rating entry for a team, if it has been seen
    pub fn entry(&self, team: &TeamId) -> Option<&TeamEntry> {
        self.teams.get(team)
    }

    /// All rating entries, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &TeamEntry> {
        self.teams.values()
    }

    /// Default entry for a team that has not played in this league
    pub fn default_entry(&self, team: TeamId) -> TeamEntry {
        TeamEntry::new(team, self.model.initial_rating())
    }

    /// Validate a record against this board without mutating anything
    pub fn validate(&self, record: &MatchRecord) -> Result<MatchDecision> {
        if record.league != self.league {
            return Err(RatingError::UnknownLeague {
                league: record.league.clone(),
            }
            .into());
        }

        if record.home == record.away {
            return Err(RatingError::InvalidOutcome {
                reason: format!("match {} references the same team twice", record.id),
            }
            .into());
        }

        if self.applied_ids.contains(&record.id) {
            return Err(RatingError::DuplicateMatch {
                match_id: record.id,
            }
            .into());
        }

        record.result.decision()
    }

    /// Whether the record predates the latest applied match of either
    /// participant, under the replay key ordering
    pub fn is_retroactive(&self, record: &MatchRecord) -> bool {
        let key = record.replay_key();
        [&record.home, &record.away].into_iter().any(|team| {
            self.teams
                .get(team)
                .and_then(|entry| entry.history.last())
                .map(|snapshot| key < (snapshot.played_at, snapshot.match_id))
                .unwrap_or(false)
        })
    }

    /// Apply one match, which must not be retroactive
    ///
    /// All validation happens before any state changes, so a failed apply
    /// leaves the board exactly as it was.
    pub fn apply(&mut self, record: MatchRecord) -> Result<()> {
        let decision = self.validate(&record)?;

        if self.is_retroactive(&record) {
            return Err(RatingError::OutOfOrderMatch {
                match_id: record.id,
                league: self.league.clone(),
            }
            .into());
        }

        let home_rating = self
            .teams
            .get(&record.home)
            .map(|entry| entry.rating)
            .unwrap_or_else(|| self.model.initial_rating());
        let away_rating = self
            .teams
            .get(&record.away)
            .map(|entry| entry.rating)
            .unwrap_or_else(|| self.model.initial_rating());

        let (new_home, new_away) = self.model.rate(&home_rating, &away_rating, decision)?;

        // Everything validated; commit.
        self.teams
            .entry(record.home.clone())
            .or_insert_with(|| TeamEntry::new(record.home.clone(), home_rating))
            .apply_match(record.id, record.played_at, new_home);
        self.teams
            .entry(record.away.clone())
            .or_insert_with(|| TeamEntry::new(record.away.clone(), away_rating))
            .apply_match(record.id, record.played_at, new_away);

        self.applied_ids.insert(record.id);
        self.applied.push(record);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatingConfig;
    use crate::rating::build_model;
    use crate::types::MatchResult;
    use crate::utils::{current_timestamp, generate_match_id};
    use chrono::Duration;

    fn board(league: &str) -> LeagueBoard {
        let model = build_model(Algorithm::Elo, &RatingConfig::default()).unwrap();
        LeagueBoard::new(league.to_string(), Algorithm::Elo, model)
    }

    fn record(league: &str, home: &str, away: &str, offset_hours: i64) -> MatchRecord {
        MatchRecord {
            id: generate_match_id(),
            league: league.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            result: MatchResult::Score { home: 2, away: 1 },
            played_at: current_timestamp() + Duration::hours(offset_hours),
        }
    }

    #[test]
    fn test_apply_updates_both_teams() {
        let mut board = board("epl");
        board.apply(record("epl", "Arsenal", "Chelsea", 0)).unwrap();

        assert_eq!(board.match_count(), 1);
        assert_eq!(board.team_count(), 2);

        let home = board.entry(&"Arsenal".to_string()).unwrap();
        let away = board.entry(&"Chelsea".to_string()).unwrap();
        assert!(home.rating.rating > 1500.0);
        assert!(away.rating.rating < 1500.0);
        assert_eq!(home.matches_played, 1);
        assert_eq!(away.matches_played, 1);
    }

    #[test]
    fn test_wrong_league_rejected() {
        let mut board = board("epl");
        let err = board
            .apply(record("sp1", "Sevilla", "Valencia", 0))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::UnknownLeague { .. })
        ));
        assert_eq!(board.match_count(), 0);
    }

    #[test]
    fn test_same_team_twice_rejected() {
        let mut board = board("epl");
        let err = board
            .apply(record("epl", "Arsenal", "Arsenal", 0))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidOutcome { .. })
        ));
    }

    #[test]
    fn test_duplicate_match_rejected() {
        let mut board = board("epl");
        let m = record("epl", "Arsenal", "Chelsea", 0);

        board.apply(m.clone()).unwrap();
        let err = board.apply(m).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::DuplicateMatch { .. })
        ));
        assert_eq!(board.match_count(), 1);
    }

    #[test]
    fn test_retroactive_apply_rejected() {
        let mut board = board("epl");
        board.apply(record("epl", "Arsenal", "Chelsea", 10)).unwrap();

        let late = record("epl", "Arsenal", "Leeds", 5);
        assert!(board.is_retroactive(&late));
        let err = board.apply(late).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::OutOfOrderMatch { .. })
        ));
    }

    #[test]
    fn test_retroactive_only_considers_participants() {
        let mut board = board("epl");
        board.apply(record("epl", "Arsenal", "Chelsea", 10)).unwrap();

        // Two fresh teams playing earlier than Arsenal's match is fine
        let other = record("epl", "Leeds", "Everton", 5);
        assert!(!board.is_retroactive(&other));
        board.apply(other).unwrap();
        assert_eq!(board.match_count(), 2);
    }

    #[test]
    fn test_failed_apply_leaves_ratings_untouched() {
        let mut board = board("epl");
        board.apply(record("epl", "Arsenal", "Chelsea", 0)).unwrap();
        let before = board.entry(&"Arsenal".to_string()).unwrap().clone();

        let mut bad = record("epl", "Arsenal", "Leeds", 1);
        bad.result = MatchResult::Score { home: -1, away: 0 };
        assert!(board.apply(bad).is_err());

        assert_eq!(board.entry(&"Arsenal".to_string()).unwrap(), &before);
        assert_eq!(board.match_count(), 1);
    }
}

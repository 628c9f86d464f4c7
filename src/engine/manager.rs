//! The rating engine
//!
//! This module provides the core `RatingEngine` that owns per-league rating
//! state, replays match history through the selected rating model, and
//! answers ranking queries.
//!
//! The engine follows a single-writer discipline: `load` and `append` are
//! blocking writes, while concurrent standings reads always observe a fully
//! consistent board because rebuilds happen off to the side and are swapped
//! in under the write lock.

use crate::config::{EngineConfig, RetroactivePolicy};
use crate::engine::board::LeagueBoard;
use crate::error::{RatingError, Result};
use crate::rating::build_model;
use crate::standings;
use crate::types::{
    Algorithm, LeagueId, MatchRecord, RankingEntry, RatingSnapshot, Team, TeamEntry, TeamId,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Mutable engine state behind the lock: league boards plus the cross-league
/// team membership registry
#[derive(Default)]
struct EngineState {
    /// Which league each team was first seen in; never reassigned
    memberships: HashMap<TeamId, LeagueId>,
    boards: HashMap<LeagueId, LeagueBoard>,
}

/// The main rating engine
pub struct RatingEngine {
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl RatingEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: RwLock::new(EngineState::default()),
        }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reset and rebuild a league's ratings by replaying `matches` through
    /// the selected algorithm
    ///
    /// Matches are sorted into replay order (chronological, match id
    /// tiebreak) before being applied, so the result is deterministic for a
    /// given input set. The league's previous board is only replaced after
    /// the whole replay succeeds; on any failure the prior state is kept.
    ///
    /// Returns the number of matches replayed.
    pub fn load(
        &self,
        league: impl Into<LeagueId>,
        mut matches: Vec<MatchRecord>,
        algorithm: Algorithm,
    ) -> Result<usize> {
        let league = league.into();
        let model = build_model(algorithm, &self.config.rating)?;

        matches.sort_by_key(MatchRecord::replay_key);

        // Validate league declarations and team membership against the
        // current registry before building anything.
        let mut new_members: HashMap<TeamId, LeagueId> = HashMap::new();
        {
            let state = self.read_state()?;
            for record in &matches {
                if record.league != league {
                    warn!(
                        match_id = %record.id,
                        declared = %record.league,
                        loading = %league,
                        "match declared for a different league"
                    );
                    return Err(RatingError::UnknownLeague {
                        league: record.league.clone(),
                    }
                    .into());
                }
                self.check_membership(&state, record, &mut new_members)?;
            }
        }

        let count = matches.len();
        let board = LeagueBoard::replay(league.clone(), algorithm, model, matches)?;

        let mut state = self.write_state()?;
        state.memberships.extend(new_members);
        state.boards.insert(league.clone(), board);
        info!(%league, matches = count, %algorithm, "league replay complete");

        Ok(count)
    }

    /// Apply a single match incrementally
    ///
    /// Equivalent to a full `load` that included this match at its
    /// chronological position. A match that predates either participant's
    /// latest applied match is handled per the configured retroactive
    /// policy: rejected with `OutOfOrderMatch`, or spliced into the history
    /// and reconciled by full replay.
    pub fn append(&self, record: MatchRecord) -> Result<()> {
        let mut state = self.write_state()?;

        let board = state.boards.get(&record.league).ok_or_else(|| {
            RatingError::UnknownLeague {
                league: record.league.clone(),
            }
        })?;
        board.validate(&record)?;

        let mut new_members: HashMap<TeamId, LeagueId> = HashMap::new();
        self.check_membership(&state, &record, &mut new_members)?;

        let board = state.boards.get(&record.league).ok_or_else(|| {
            RatingError::UnknownLeague {
                league: record.league.clone(),
            }
        })?;

        if board.is_retroactive(&record) {
            match self.config.replay.retroactive {
                RetroactivePolicy::Reject => {
                    warn!(
                        match_id = %record.id,
                        league = %record.league,
                        "rejecting retroactive append; a full load is required"
                    );
                    return Err(RatingError::OutOfOrderMatch {
                        match_id: record.id,
                        league: record.league.clone(),
                    }
                    .into());
                }
                RetroactivePolicy::Reconcile => {
                    let league = record.league.clone();
                    let match_id = record.id;
                    let algorithm = board.algorithm();

                    let mut records = board.applied().to_vec();
                    records.push(record);
                    records.sort_by_key(MatchRecord::replay_key);

                    let model = build_model(algorithm, &self.config.rating)?;
                    let rebuilt = LeagueBoard::replay(league.clone(), algorithm, model, records)?;

                    state.boards.insert(league.clone(), rebuilt);
                    state.memberships.extend(new_members);
                    debug!(%match_id, %league, "reconciled retroactive match by full replay");
                    return Ok(());
                }
            }
        }

        let league = record.league.clone();
        let match_id = record.id;
        let board = state.boards.get_mut(&league).ok_or_else(|| {
            RatingError::UnknownLeague {
                league: league.clone(),
            }
        })?;
        board.apply(record)?;
        state.memberships.extend(new_members);
        debug!(%match_id, %league, "appended match");

        Ok(())
    }

    /// Current rating entry for a team in a loaded league
    ///
    /// A team the league has never seen gets the algorithm's default rating
    /// with zero matches played. Querying a league that was never loaded
    /// fails with `UnknownLeague`.
    pub fn current_rating(&self, league: &LeagueId, team: &TeamId) -> Result<TeamEntry> {
        let state = self.read_state()?;
        let board = self.board(&state, league)?;

        Ok(board
            .entry(team)
            .cloned()
            .unwrap_or_else(|| board.default_entry(team.clone())))
    }

    /// Per-match rating timeline for a team, in replay order
    pub fn rating_history(&self, league: &LeagueId, team: &TeamId) -> Result<Vec<RatingSnapshot>> {
        let state = self.read_state()?;
        let board = self.board(&state, league)?;

        Ok(board
            .entry(team)
            .map(|entry| entry.history.clone())
            .unwrap_or_default())
    }

    /// Ordered standings for a league
    ///
    /// Sorted descending by the conservative ranking score with the
    /// configured tie break. With `as_of`, ratings are reconstructed by
    /// re-replaying the retained history up to the cutoff; matches after the
    /// cutoff are never included.
    pub fn standings(
        &self,
        league: &LeagueId,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<RankingEntry>> {
        let state = self.read_state()?;
        let board = self.board(&state, league)?;

        let entries: Vec<TeamEntry> = match as_of {
            None => board.entries().cloned().collect(),
            Some(cutoff) => {
                let records: Vec<MatchRecord> = board
                    .applied()
                    .iter()
                    .filter(|record| record.played_at <= cutoff)
                    .cloned()
                    .collect();
                let model = build_model(board.algorithm(), &self.config.rating)?;
                let snapshot =
                    LeagueBoard::replay(league.clone(), board.algorithm(), model, records)?;
                snapshot.entries().cloned().collect()
            }
        };

        Ok(standings::rank_entries(entries, &self.config.ranking))
    }

    /// Teams registered to a loaded league, sorted by name
    pub fn teams(&self, league: &LeagueId) -> Result<Vec<Team>> {
        let state = self.read_state()?;
        self.board(&state, league)?;

        let mut teams: Vec<Team> = state
            .memberships
            .iter()
            .filter(|(_, member_of)| *member_of == league)
            .map(|(name, member_of)| Team::new(name.clone(), member_of.clone()))
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    /// Leagues with loaded state, sorted by name
    pub fn leagues(&self) -> Result<Vec<LeagueId>> {
        let state = self.read_state()?;
        let mut leagues: Vec<LeagueId> = state.boards.keys().cloned().collect();
        leagues.sort();
        Ok(leagues)
    }

    /// Whether a league has loaded state
    pub fn is_loaded(&self, league: &LeagueId) -> bool {
        self.read_state()
            .map(|state| state.boards.contains_key(league))
            .unwrap_or(false)
    }

    /// Number of matches applied for a league
    pub fn match_count(&self, league: &LeagueId) -> Result<usize> {
        let state = self.read_state()?;
        Ok(self.board(&state, league)?.match_count())
    }

    /// The algorithm a league was loaded with
    pub fn algorithm(&self, league: &LeagueId) -> Result<Algorithm> {
        let state = self.read_state()?;
        Ok(self.board(&state, league)?.algorithm())
    }

    fn board<'a>(&self, state: &'a EngineState, league: &LeagueId) -> Result<&'a LeagueBoard> {
        state.boards.get(league).ok_or_else(|| {
            RatingError::UnknownLeague {
                league: league.clone(),
            }
            .into()
        })
    }

    /// Check both participants against the membership registry, collecting
    /// registrations for teams seen for the first time
    fn check_membership(
        &self,
        state: &EngineState,
        record: &MatchRecord,
        new_members: &mut HashMap<TeamId, LeagueId>,
    ) -> Result<()> {
        for team in [&record.home, &record.away] {
            match state.memberships.get(team) {
                Some(existing) if existing != &record.league => {
                    return Err(RatingError::TeamLeagueMismatch {
                        team: team.clone(),
                        expected: existing.clone(),
                        declared: record.league.clone(),
                    }
                    .into());
                }
                Some(_) => {}
                None => {
                    new_members.insert(team.clone(), record.league.clone());
                }
            }
        }
        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, EngineState>> {
        self.state.read().map_err(|_| {
            RatingError::InternalError {
                message: "Failed to acquire engine read lock".to_string(),
            }
            .into()
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, EngineState>> {
        self.state.write().map_err(|_| {
            RatingError::InternalError {
                message: "Failed to acquire engine write lock".to_string(),
            }
            .into()
        })
    }
}

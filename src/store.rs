//! Match store interface and implementations
//!
//! This module defines the persistence contract for match records. The engine
//! never reads a store itself; callers fetch ordered records and hand them to
//! `load`/`append`.

use crate::error::{RatingError, Result};
use crate::types::{LeagueId, MatchId, MatchRecord};
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for match record storage operations
pub trait MatchStore: Send + Sync {
    /// Record a single match; duplicate ids are rejected
    fn record_match(&self, record: MatchRecord) -> Result<()>;

    /// Record multiple matches atomically
    fn record_matches(&self, records: Vec<MatchRecord>) -> Result<()>;

    /// Get a match by id
    fn get_match(&self, match_id: &MatchId) -> Result<Option<MatchRecord>>;

    /// All matches for a league in replay order (chronological, id tiebreak)
    fn matches_for_league(&self, league: &LeagueId) -> Result<Vec<MatchRecord>>;

    /// All matches in replay order
    fn all_matches(&self) -> Result<Vec<MatchRecord>>;

    /// Remove a match record
    fn remove_match(&self, match_id: &MatchId) -> Result<bool>;

    /// Total number of recorded matches
    fn match_count(&self) -> Result<usize>;
}

/// In-memory match store implementation
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, MatchRecord>>,
}

impl InMemoryMatchStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read_lock(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<MatchId, MatchRecord>>> {
        self.matches.read().map_err(|_| {
            RatingError::InternalError {
                message: "Failed to acquire match store read lock".to_string(),
            }
            .into()
        })
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<MatchId, MatchRecord>>> {
        self.matches.write().map_err(|_| {
            RatingError::InternalError {
                message: "Failed to acquire match store write lock".to_string(),
            }
            .into()
        })
    }
}

impl MatchStore for InMemoryMatchStore {
    fn record_match(&self, record: MatchRecord) -> Result<()> {
        let mut matches = self.write_lock()?;

        if matches.contains_key(&record.id) {
            return Err(RatingError::DuplicateMatch {
                match_id: record.id,
            }
            .into());
        }

        matches.insert(record.id, record);
        Ok(())
    }

    fn record_matches(&self, records: Vec<MatchRecord>) -> Result<()> {
        let mut matches = self.write_lock()?;

        // Validate the whole batch before touching the map
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if matches.contains_key(&record.id) || !seen.insert(record.id) {
                return Err(RatingError::DuplicateMatch {
                    match_id: record.id,
                }
                .into());
            }
        }

        for record in records {
            matches.insert(record.id, record);
        }
        Ok(())
    }

    fn get_match(&self, match_id: &MatchId) -> Result<Option<MatchRecord>> {
        let matches = self.read_lock()?;
        Ok(matches.get(match_id).cloned())
    }

    fn matches_for_league(&self, league: &LeagueId) -> Result<Vec<MatchRecord>> {
        let matches = self.read_lock()?;

        let mut records: Vec<MatchRecord> = matches
            .values()
            .filter(|record| &record.league == league)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.replay_key());

        Ok(records)
    }

    fn all_matches(&self) -> Result<Vec<MatchRecord>> {
        let matches = self.read_lock()?;

        let mut records: Vec<MatchRecord> = matches.values().cloned().collect();
        records.sort_by_key(|record| record.replay_key());

        Ok(records)
    }

    fn remove_match(&self, match_id: &MatchId) -> Result<bool> {
        let mut matches = self.write_lock()?;
        Ok(matches.remove(match_id).is_some())
    }

    fn match_count(&self) -> Result<usize> {
        let matches = self.read_lock()?;
        Ok(matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchResult, TeamId};
    use crate::utils::{current_timestamp, generate_match_id};
    use chrono::Duration;

    fn record(league: &str, home: &str, away: &str, offset_hours: i64) -> MatchRecord {
        MatchRecord {
            id: generate_match_id(),
            league: league.to_string(),
            home: TeamId::from(home),
            away: TeamId::from(away),
            result: MatchResult::Score { home: 1, away: 0 },
            played_at: current_timestamp() + Duration::hours(offset_hours),
        }
    }

    #[test]
    fn test_record_and_get() {
        let store = InMemoryMatchStore::new();
        let m = record("epl", "Arsenal", "Chelsea", 0);
        let id = m.id;

        store.record_match(m.clone()).unwrap();
        assert_eq!(store.get_match(&id).unwrap(), Some(m));
        assert_eq!(store.match_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = InMemoryMatchStore::new();
        let m = record("epl", "Arsenal", "Chelsea", 0);

        store.record_match(m.clone()).unwrap();
        let err = store.record_match(m).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::DuplicateMatch { .. })
        ));
    }

    #[test]
    fn test_batch_with_duplicate_leaves_store_empty() {
        let store = InMemoryMatchStore::new();
        let m = record("epl", "Arsenal", "Chelsea", 0);
        let batch = vec![record("epl", "Leeds", "Everton", 1), m.clone(), m];

        assert!(store.record_matches(batch).is_err());
        assert_eq!(store.match_count().unwrap(), 0);
    }

    #[test]
    fn test_league_query_is_filtered_and_ordered() {
        let store = InMemoryMatchStore::new();
        let late = record("epl", "Arsenal", "Chelsea", 48);
        let early = record("epl", "Leeds", "Everton", 2);
        let other = record("sp1", "Sevilla", "Valencia", 1);

        store
            .record_matches(vec![late.clone(), early.clone(), other])
            .unwrap();

        let epl = store.matches_for_league(&"epl".to_string()).unwrap();
        assert_eq!(epl.len(), 2);
        assert_eq!(epl[0], early);
        assert_eq!(epl[1], late);
    }

    #[test]
    fn test_timestamp_ties_break_by_id() {
        let store = InMemoryMatchStore::new();
        let played_at = current_timestamp();
        let mut a = record("epl", "Arsenal", "Chelsea", 0);
        let mut b = record("epl", "Leeds", "Everton", 0);
        a.played_at = played_at;
        b.played_at = played_at;

        store.record_matches(vec![a.clone(), b.clone()]).unwrap();

        let ordered = store.matches_for_league(&"epl".to_string()).unwrap();
        let expected_first = if a.id < b.id { &a } else { &b };
        assert_eq!(&ordered[0], expected_first);
    }

    #[test]
    fn test_remove_match() {
        let store = InMemoryMatchStore::new();
        let m = record("epl", "Arsenal", "Chelsea", 0);
        let id = m.id;

        store.record_match(m).unwrap();
        assert!(store.remove_match(&id).unwrap());
        assert!(!store.remove_match(&id).unwrap());
        assert_eq!(store.match_count().unwrap(), 0);
    }
}

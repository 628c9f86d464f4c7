//! Test fixtures for integration testing

use chrono::{DateTime, Duration, TimeZone, Utc};
use league_ratings::types::{MatchRecord, MatchResult};
use league_ratings::utils::generate_match_id;

/// Fixed season start so fixtures stay deterministic
pub fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 17, 15, 0, 0).unwrap()
}

/// Build a scoreline match record, `round` days after kickoff
pub fn score_match(
    league: &str,
    home: &str,
    away: &str,
    home_score: i32,
    away_score: i32,
    round: i64,
) -> MatchRecord {
    MatchRecord {
        id: generate_match_id(),
        league: league.to_string(),
        home: home.to_string(),
        away: away.to_string(),
        result: MatchResult::Score {
            home: home_score,
            away: away_score,
        },
        played_at: kickoff() + Duration::days(round),
    }
}

/// A short double round-robin between four sides
///
/// Arsenal wins everything, Chelsea and Leeds trade results, Everton loses
/// everything except one draw.
pub fn sample_season(league: &str) -> Vec<MatchRecord> {
    vec![
        score_match(league, "Arsenal", "Chelsea", 2, 0, 0),
        score_match(league, "Leeds", "Everton", 1, 0, 1),
        score_match(league, "Arsenal", "Leeds", 3, 1, 2),
        score_match(league, "Chelsea", "Everton", 2, 2, 3),
        score_match(league, "Everton", "Arsenal", 0, 2, 4),
        score_match(league, "Chelsea", "Leeds", 1, 0, 5),
        score_match(league, "Chelsea", "Arsenal", 0, 1, 6),
        score_match(league, "Everton", "Leeds", 0, 3, 7),
        score_match(league, "Leeds", "Arsenal", 0, 1, 8),
        score_match(league, "Everton", "Chelsea", 1, 2, 9),
        score_match(league, "Arsenal", "Everton", 4, 0, 10),
        score_match(league, "Leeds", "Chelsea", 2, 1, 11),
    ]
}

/// Install a tracing subscriber once for test debugging output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

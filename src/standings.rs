//! Ranking query layer
//!
//! Turns a set of team entries into an ordered standings list. The sort key
//! is the conservative ranking score: rating minus a configured multiple of
//! uncertainty, which penalizes teams the model is still unsure about. For
//! Elo the uncertainty is zero and the score degenerates to the raw rating.

use crate::config::{RankingSettings, TieBreak};
use crate::types::{RankingEntry, TeamEntry, TeamRating};
use std::cmp::Ordering;

/// Conservative ranking score for one rating
pub fn ranking_score(rating: &TeamRating, conservative_multiplier: f64) -> f64 {
    rating.rating - conservative_multiplier * rating.uncertainty
}

/// Sort team entries into standings order and assign rank positions
pub fn rank_entries(entries: Vec<TeamEntry>, settings: &RankingSettings) -> Vec<RankingEntry> {
    let mut scored: Vec<(TeamEntry, f64)> = entries
        .into_iter()
        .map(|entry| {
            let score = ranking_score(&entry.rating, settings.conservative_multiplier);
            (entry, score)
        })
        .collect();

    scored.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| tie_break(a, b, settings.tie_break))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (entry, score))| RankingEntry {
            rank: index as u32 + 1,
            team: entry.team,
            rating: entry.rating,
            ranking_score: score,
            matches_played: entry.matches_played,
        })
        .collect()
}

fn tie_break(a: &TeamEntry, b: &TeamEntry, tie_break: TieBreak) -> Ordering {
    match tie_break {
        TieBreak::TeamName => a.team.cmp(&b.team),
        TieBreak::MatchesPlayed => b
            .matches_played
            .cmp(&a.matches_played)
            .then_with(|| a.team.cmp(&b.team)),
    }
}

// src/services/ranking.rs

//! Dense leaderboard ranking.
//!
//! Ranks are recomputed from a fresh snapshot on every query. Tied scores share a
//! rank and the next distinct score gets exactly one more, so `[100, 100, 90]`
//! ranks as `[1, 1, 2]`.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::player::{PlayerId, RankedEntry, ScoreRecord};

/// Number of distinct ranks shown on the home page.
pub const DEFAULT_TOP_PLAYERS: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("player {0} is not on the leaderboard")]
    NotFound(PlayerId),
}

/// Sorts the snapshot by descending score and assigns dense ranks.
///
/// The sort is stable: players with equal scores keep their snapshot order.
pub fn rank_players(mut snapshot: Vec<ScoreRecord>) -> Vec<RankedEntry> {
    snapshot.sort_by(|a, b| b.score_total.cmp(&a.score_total));

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(snapshot.len());
    for record in snapshot {
        let rank = match ranked.last() {
            None => 1,
            Some(prev) if prev.record.score_total == record.score_total => prev.rank,
            Some(prev) => prev.rank + 1,
        };
        ranked.push(RankedEntry { record, rank });
    }

    ranked
}

/// The player together with the nearest player ranked directly above and directly below.
///
/// Ties collapse to one representative: above is the last entry of the rank group
/// just better than the player's, below is the first entry of the group just worse.
/// Returns one to three entries, or none for an empty leaderboard.
pub fn neighborhood(
    ranked: &[RankedEntry],
    player_id: PlayerId,
) -> Result<Vec<RankedEntry>, RankingError> {
    if ranked.is_empty() {
        return Ok(Vec::new());
    }

    let current = ranked
        .iter()
        .find(|entry| entry.record.player_id == player_id)
        .ok_or(RankingError::NotFound(player_id))?;

    let mut above = None;
    let mut below = None;
    for entry in ranked {
        if entry.rank < current.rank {
            above = Some(entry);
        } else if entry.rank > current.rank {
            below = Some(entry);
            break;
        }
    }

    let window = above
        .into_iter()
        .chain(std::iter::once(current))
        .chain(below)
        .cloned()
        .collect();

    Ok(window)
}

/// One representative per rank for the first `n` distinct ranks.
///
/// Only the first player of each rank group is listed; tied players after it are skipped.
pub fn top_summary(ranked: &[RankedEntry], n: usize) -> Vec<RankedEntry> {
    let mut seen_ranks = HashSet::with_capacity(n);
    let mut summary = Vec::with_capacity(n);

    for entry in ranked {
        if seen_ranks.len() >= n {
            break;
        }
        if seen_ranks.insert(entry.rank) {
            summary.push(entry.clone());
        }
    }

    summary
}

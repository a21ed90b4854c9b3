//! Leaderboard store - in-memory sorted-set semantics
//!
//! Mirrors the persisted sorted set the production backend keeps in redis:
//! one best score per user, ranked descending, ties broken by user id
//! descending (redis ZREVRANK order for equal scores). Player counts are
//! small enough that sorting on query beats maintaining an ordered index.

use std::collections::HashMap;

use crate::adapter::protocol::LeaderboardEntry;

const DEFAULT_USERNAME: &str = "Player";
pub const DEFAULT_TOP_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// 1-based rank after the submission
    pub rank: usize,
    /// True when this score replaced (or created) the user's stored best
    pub is_new_best: bool,
}

#[derive(Debug, Clone)]
struct UserRecord {
    score: u64,
    username: Option<String>,
}

/// The whole leaderboard. Wrap in a lock for shared access; the store
/// itself is single-writer plain data.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardStore {
    users: HashMap<String, UserRecord>,
}

impl LeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score. Only a strictly higher score replaces the stored
    /// best; an equal or lower submission leaves the record (and username)
    /// untouched but still reports the user's current rank.
    pub fn submit(&mut self, user_id: &str, score: u64, username: Option<&str>) -> SubmitOutcome {
        let is_new_best = match self.users.get(user_id) {
            Some(record) => score > record.score,
            None => true,
        };

        if is_new_best {
            let record = self
                .users
                .entry(user_id.to_string())
                .or_insert(UserRecord {
                    score,
                    username: None,
                });
            record.score = score;
            // A missing username never erases a stored one
            if let Some(name) = username {
                record.username = Some(name.to_string());
            }
        }

        SubmitOutcome {
            rank: self.rank(user_id).unwrap_or(0),
            is_new_best,
        }
    }

    /// Top `limit` entries, best first.
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.ordered()
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (user_id, record))| LeaderboardEntry {
                user_id: user_id.to_string(),
                username: record
                    .username
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
                score: record.score,
                rank: i + 1,
            })
            .collect()
    }

    /// 1-based rank of a user, None if they never submitted.
    pub fn rank(&self, user_id: &str) -> Option<usize> {
        self.ordered()
            .iter()
            .position(|(id, _)| *id == user_id)
            .map(|i| i + 1)
    }

    /// Rank a hypothetical score would earn: strictly higher scores + 1.
    pub fn rank_for_score(&self, score: u64) -> usize {
        self.users.values().filter(|r| r.score > score).count() + 1
    }

    pub fn total_players(&self) -> usize {
        self.users.len()
    }

    /// Score descending, ties by user id descending.
    fn ordered(&self) -> Vec<(&str, &UserRecord)> {
        let mut entries: Vec<(&str, &UserRecord)> = self
            .users
            .iter()
            .map(|(id, record)| (id.as_str(), record))
            .collect();
        entries.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(b.0.cmp(a.0)));
        entries
    }
}

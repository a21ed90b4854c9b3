//! Protocol module - JSON wire types for saved games and the leaderboard
//!
//! Field names are camelCase to stay bit-compatible with the existing
//! client/server JSON. The saved-game shape mirrors the client's local
//! save; the leaderboard messages mirror the backend's endpoints as
//! line-delimited request/response pairs.

use serde::{Deserialize, Serialize};

use crate::core::grid::GRID_SIZE;
use crate::core::session::GameSession;
use crate::types::{Cell, GameSettings, GRID_COLS, GRID_ROWS};

// ============== Saved game ==============

/// One occupied cell in a saved game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlock {
    pub col: i8,
    pub row: i8,
    pub value: u32,
}

/// Full saved-game state as written to disk / sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub blocks: Vec<SavedBlock>,
    pub score: u64,
    pub best_score: u64,
    /// Upcoming drop values, front first
    pub lookahead: Vec<u32>,
    /// Unix epoch millis; absent for states never written to storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<u64>,
}

impl SavedGame {
    pub fn from_session(session: &GameSession) -> Self {
        let (cells, score, best_score, lookahead) = session.export_state();

        let mut blocks = Vec::with_capacity(session.grid().occupied_count());
        for row in 0..GRID_ROWS as i8 {
            for col in 0..GRID_COLS as i8 {
                let idx = (row as usize) * (GRID_COLS as usize) + (col as usize);
                if let Some(value) = cells[idx] {
                    blocks.push(SavedBlock { col, row, value });
                }
            }
        }

        Self {
            blocks,
            score,
            best_score,
            lookahead: lookahead.to_vec(),
            saved_at: None,
        }
    }

    /// Rebuild a session. Blocks at out-of-range coordinates are dropped
    /// with a warning; the session's own load path re-validates values and
    /// re-applies gravity.
    pub fn into_session(&self, seed: u32, settings: GameSettings) -> GameSession {
        let mut cells: [Cell; GRID_SIZE] = [None; GRID_SIZE];
        for block in &self.blocks {
            let in_range = (0..GRID_COLS as i8).contains(&block.col)
                && (0..GRID_ROWS as i8).contains(&block.row);
            if !in_range {
                log::warn!(
                    "dropping saved block out of range: ({}, {})",
                    block.col,
                    block.row
                );
                continue;
            }
            let idx = (block.row as usize) * (GRID_COLS as usize) + (block.col as usize);
            cells[idx] = Some(block.value);
        }

        GameSession::from_saved(
            seed,
            settings,
            cells,
            self.score,
            self.best_score,
            &self.lookahead,
        )
    }
}

// ============== Leaderboard: client -> server ==============

/// One request per line; `type` selects the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LeaderboardRequest {
    #[serde(rename = "submit", rename_all = "camelCase")]
    Submit {
        user_id: String,
        score: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    #[serde(rename = "top")]
    Top {
        #[serde(default)]
        limit: Option<usize>,
    },
    #[serde(rename = "rank", rename_all = "camelCase")]
    Rank { user_id: String },
    #[serde(rename = "rank-for-score")]
    RankForScore { score: u64 },
    #[serde(rename = "stats")]
    Stats,
}

// ============== Leaderboard: server -> client ==============

/// One row of the top-N listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub score: u64,
    /// 1-based
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// 1-based rank after the submission
    pub rank: usize,
    pub is_new_best: bool,
}

/// `rank` is null for users who never submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankResponse {
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankForScoreResponse {
    pub rank: usize,
    pub total_players: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_players: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

//! Snapshot module - full-copy state capture for undo and save/load
//!
//! A snapshot is always a deep copy: the restored state never aliases the
//! live grid, so a later cascade cannot corrupt a held snapshot.

use arrayvec::ArrayVec;

use crate::core::grid::{Grid, GRID_SIZE};
use crate::core::spawn::{SpawnQueue, LOOKAHEAD};
use crate::types::Cell;

/// One full copy of the player-visible session state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cells: [Cell; GRID_SIZE],
    pub score: u64,
    pub lookahead: ArrayVec<u32, LOOKAHEAD>,
}

impl Snapshot {
    pub fn capture(grid: &Grid, score: u64, queue: &SpawnQueue) -> Self {
        let mut lookahead = ArrayVec::new();
        lookahead.extend(queue.peek().iter().copied());
        Self {
            cells: grid.to_cells(),
            score,
            lookahead,
        }
    }
}

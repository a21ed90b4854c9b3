//! Game session module - the top-level state machine
//!
//! This module ties together the core components: grid, merge resolver,
//! spawn queue, and snapshots. It gates input (a session that is game-over
//! or mid-resolution rejects drops), runs items through a modal targeting
//! sub-state, and keeps the score and single-level undo snapshot.
//!
//! The whole cascade for a drop runs inside one `drop_at` call, so no
//! second drop can observe a half-resolved board; the processing flag is
//! kept anyway as a guard against re-entrant calls through item handlers.

use arrayvec::ArrayVec;

use crate::core::grid::{Grid, GRID_SIZE};
use crate::core::merge::{self, MergeStep};
use crate::core::rng::SimpleRng;
use crate::core::snapshot::Snapshot;
use crate::core::spawn::{SpawnQueue, LOOKAHEAD};
use crate::types::{Cell, GameSettings, ItemKind, Rejection, GRID_COLS};

/// What a completed drop (or picked-block placement) produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DropResult {
    /// Merge events in resolution order; combo numbering follows this order
    pub steps: Vec<MergeStep>,
    pub score_delta: u64,
    pub game_over: bool,
}

/// What an item activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A targeting item is armed; the next target call consumes it
    Armed,
    Shuffled,
    Undone,
}

/// What a target click did with the armed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Bomb: the block at the target was removed
    Removed,
    /// Split: the target block was halved to this value
    Split(u32),
    /// Pickup: this value was lifted off the board and is now held
    PickedUp(u32),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    grid: Grid,
    score: u64,
    /// Monotonic across restarts within this session
    best_score: u64,
    settings: GameSettings,
    rng: SimpleRng,
    queue: SpawnQueue,
    game_over: bool,
    /// Re-entrancy guard for drop resolution
    processing: bool,
    /// Armed targeting item, if any (modal: arming another replaces it)
    active_item: Option<ItemKind>,
    /// Block lifted by the pickup item, waiting for placement
    picked: Option<u32>,
    /// Single-level undo; overwritten by every committed drop
    undo_snapshot: Option<Snapshot>,
}

impl GameSession {
    /// Create a new session with the given RNG seed
    pub fn new(seed: u32, settings: GameSettings) -> Self {
        let grid = Grid::new();
        let mut rng = SimpleRng::new(seed);
        let queue = SpawnQueue::new(&grid, &settings, &mut rng);

        Self {
            grid,
            score: 0,
            best_score: 0,
            settings,
            rng,
            queue,
            game_over: false,
            processing: false,
            active_item: None,
            picked: None,
            undo_snapshot: None,
        }
    }

    /// Restore a session from saved state. Cell values that are not powers
    /// of two are dropped; gravity is re-applied so a hand-edited or
    /// corrupted save cannot violate the floating-block invariant.
    pub fn from_saved(
        seed: u32,
        settings: GameSettings,
        cells: [Cell; GRID_SIZE],
        score: u64,
        best_score: u64,
        lookahead: &[u32],
    ) -> Self {
        let mut grid = Grid::new();
        let sanitized: [Cell; GRID_SIZE] =
            cells.map(|c| c.filter(|v| v.is_power_of_two() && *v >= 2));
        grid.load_cells(sanitized);
        if grid.heal_floating_blocks() {
            log::warn!("saved grid had floating blocks, re-applied gravity");
        }

        let mut rng = SimpleRng::new(seed);
        let queue = SpawnQueue::from_saved(lookahead, &grid, &settings, &mut rng);
        let game_over = grid.is_top_row_filled();

        Self {
            grid,
            score,
            best_score: best_score.max(score),
            settings,
            rng,
            queue,
            game_over,
            processing: false,
            active_item: None,
            picked: None,
            undo_snapshot: None,
        }
    }

    // --- accessors ---

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Value that will drop next
    pub fn next_value(&self) -> u32 {
        self.queue.current()
    }

    /// Visible spawn queue, front first
    pub fn lookahead(&self) -> &[u32] {
        self.queue.peek()
    }

    pub fn active_item(&self) -> Option<ItemKind> {
        self.active_item
    }

    /// Value currently held by the pickup item
    pub fn picked_value(&self) -> Option<u32> {
        self.picked
    }

    pub fn can_undo(&self) -> bool {
        self.undo_snapshot.is_some()
    }

    // --- drops ---

    /// Drop the next queued value into a column and resolve the cascade.
    ///
    /// A full column is the terminal signal: the session flips to game over
    /// and nothing on the board changes. A rejected request (wrong state,
    /// bad column) mutates nothing at all.
    pub fn drop_at(&mut self, col: i8) -> Result<DropResult, Rejection> {
        self.guard_drop()?;
        if col < 0 || col >= GRID_COLS as i8 {
            return Err(Rejection::Invalid);
        }

        let Some(row) = self.grid.lowest_empty_row(col) else {
            self.game_over = true;
            return Ok(DropResult {
                game_over: true,
                ..DropResult::default()
            });
        };

        // Snapshot before any mutation so undo restores the pre-drop state.
        self.undo_snapshot = Some(Snapshot::capture(&self.grid, self.score, &self.queue));

        self.processing = true;
        let value = self.queue.draw(&self.grid, &self.settings, &mut self.rng);
        let placed = self.grid.place(col, row, value);
        debug_assert!(placed);

        let result = self.finish_resolution(col, row);
        self.processing = false;
        Ok(result)
    }

    /// Shared tail of a drop and a picked-block placement: run the cascade,
    /// apply the score, check the terminal condition.
    fn finish_resolution(&mut self, col: i8, row: i8) -> DropResult {
        let cascade = merge::resolve_cascade(&mut self.grid, col, row, &self.settings);

        self.score = self.score.saturating_add(cascade.score_delta);
        self.best_score = self.best_score.max(self.score);

        let game_over = self.grid.is_top_row_filled();
        if game_over {
            self.game_over = true;
        }

        DropResult {
            steps: cascade.steps,
            score_delta: cascade.score_delta,
            game_over,
        }
    }

    fn guard_drop(&self) -> Result<(), Rejection> {
        if self.game_over || self.processing || self.picked.is_some() {
            return Err(Rejection::NotApplicable);
        }
        if self.active_item.is_some() {
            // An armed item intercepts grid input; drops wait for it.
            return Err(Rejection::NotApplicable);
        }
        Ok(())
    }

    // --- items ---

    /// Activate an item. Targeting items (bomb, split, pickup) arm and wait
    /// for a target; arming while another item is armed cancels the first
    /// without effect. Shuffle and undo apply immediately.
    pub fn activate_item(&mut self, kind: ItemKind) -> Result<ItemOutcome, Rejection> {
        if self.game_over || self.processing {
            return Err(Rejection::NotApplicable);
        }
        if self.picked.is_some() {
            // A held block must be placed before anything else happens.
            return Err(Rejection::NotApplicable);
        }

        if kind.needs_target() {
            self.active_item = Some(kind);
            return Ok(ItemOutcome::Armed);
        }

        // Immediate items cancel any armed one.
        self.active_item = None;
        match kind {
            ItemKind::Shuffle => {
                if !self.grid.shuffle(&mut self.rng) {
                    return Err(Rejection::NotApplicable);
                }
                // Rearranged blocks never merge on their own; the board is
                // packed and settled by construction.
                Ok(ItemOutcome::Shuffled)
            }
            ItemKind::Undo => {
                let Some(snapshot) = self.undo_snapshot.take() else {
                    return Err(Rejection::NotApplicable);
                };
                self.grid.load_cells(snapshot.cells);
                self.score = snapshot.score;
                self.queue = SpawnQueue::from_saved(
                    &snapshot.lookahead,
                    &self.grid,
                    &self.settings,
                    &mut self.rng,
                );
                self.game_over = false;
                Ok(ItemOutcome::Undone)
            }
            _ => unreachable!("targeting items handled above"),
        }
    }

    /// Cancel the armed item, if any. A held picked block cannot be
    /// cancelled; it has already left the board and must be placed.
    pub fn cancel_item(&mut self) -> Result<(), Rejection> {
        if self.picked.is_some() {
            return Err(Rejection::NotApplicable);
        }
        if self.active_item.take().is_none() {
            return Err(Rejection::NotApplicable);
        }
        Ok(())
    }

    /// Apply the armed item to a grid cell. An invalid target (out of range,
    /// empty cell) leaves the item armed; a policy refusal (split on a 2)
    /// also leaves it armed. A successful application consumes the item.
    pub fn target_at(&mut self, col: i8, row: i8) -> Result<TargetOutcome, Rejection> {
        if self.game_over || self.processing {
            return Err(Rejection::NotApplicable);
        }
        let Some(kind) = self.active_item else {
            return Err(Rejection::NotApplicable);
        };

        if !self.grid.is_occupied(col, row) {
            return Err(Rejection::Invalid);
        }

        let outcome = match kind {
            ItemKind::Bomb => {
                // Removal settles the column but never triggers merges.
                self.grid.remove_block(col, row);
                TargetOutcome::Removed
            }
            ItemKind::Split => {
                let Some(new_value) = self.grid.split_block(col, row) else {
                    return Err(Rejection::NotApplicable);
                };
                TargetOutcome::Split(new_value)
            }
            ItemKind::Pickup => {
                let value = self
                    .grid
                    .pickup_block(col, row)
                    .ok_or(Rejection::Invalid)?;
                self.picked = Some(value);
                TargetOutcome::PickedUp(value)
            }
            ItemKind::Shuffle | ItemKind::Undo => unreachable!("never armed"),
        };

        self.active_item = None;
        Ok(outcome)
    }

    /// Place the held picked block into a column. The placement resolves
    /// merges exactly like a drop, but does not consume the spawn queue
    /// and is not undoable (the snapshot belongs to real drops).
    pub fn place_picked_at(&mut self, col: i8) -> Result<DropResult, Rejection> {
        if self.game_over || self.processing {
            return Err(Rejection::NotApplicable);
        }
        let Some(value) = self.picked else {
            return Err(Rejection::NotApplicable);
        };
        if col < 0 || col >= GRID_COLS as i8 {
            return Err(Rejection::Invalid);
        }
        let Some(row) = self.grid.lowest_empty_row(col) else {
            return Err(Rejection::NotApplicable);
        };

        self.picked = None;
        self.processing = true;
        let placed = self.grid.place(col, row, value);
        debug_assert!(placed);
        let result = self.finish_resolution(col, row);
        self.processing = false;
        Ok(result)
    }

    // --- lifecycle ---

    /// Reset for a new game. Best score survives; everything else is fresh.
    pub fn restart(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.queue = SpawnQueue::new(&self.grid, &self.settings, &mut self.rng);
        self.game_over = false;
        self.processing = false;
        self.active_item = None;
        self.picked = None;
        self.undo_snapshot = None;
    }

    /// Exported state for the persistence boundary.
    pub fn export_state(&self) -> ([Cell; GRID_SIZE], u64, u64, ArrayVec<u32, LOOKAHEAD>) {
        let mut lookahead = ArrayVec::new();
        lookahead.extend(self.queue.peek().iter().copied());
        (self.grid.to_cells(), self.score, self.best_score, lookahead)
    }
}

//! Grid module - manages the game grid
//!
//! The grid is a 5x8 matrix where each cell is empty or holds a power-of-two
//! block value. Uses a flat array for cache locality and zero-allocation.
//! Coordinates: (col, row) where col ranges 0..4 (left to right), row ranges
//! 0..7 (top to bottom). Blocks enter at row 0 and settle toward row 7.
//!
//! Merging is flood-fill based: the full 4-connected set of equal-valued
//! cells merges into one doubled block, not just an adjacent pair.

use arrayvec::ArrayVec;

use crate::core::rng::SimpleRng;
use crate::types::{Cell, GRID_COLS, GRID_ROWS};

/// Total number of cells on the grid
pub const GRID_SIZE: usize = (GRID_COLS as usize) * (GRID_ROWS as usize);

const NEIGHBORS_4: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// The connected set of equal-valued cells consumed by one merge commit.
///
/// `cells` always contains the anchor and has at least 2 entries; every
/// member held `value` at detection time. The anchor survives the commit
/// with value `2 * value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub anchor_col: i8,
    pub anchor_row: i8,
    pub value: u32,
    pub cells: ArrayVec<(i8, i8), GRID_SIZE>,
}

impl MergeGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

/// The game grid - 5 columns x 8 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= GRID_COLS as i8 || row < 0 || row >= GRID_ROWS as i8 {
            return None;
        }
        Some((row as usize) * (GRID_COLS as usize) + (col as usize))
    }

    pub fn cols(&self) -> u8 {
        GRID_COLS
    }

    pub fn rows(&self) -> u8 {
        GRID_ROWS
    }

    /// Get cell at (col, row). Returns None if out of bounds.
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at (col, row). Returns false if out of bounds.
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        debug_assert!(cell.map_or(true, |v| v.is_power_of_two() && v >= 2));
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and occupied
    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Some(_)))
    }

    /// Lowest empty row in a column, scanning from the bottom upward.
    ///
    /// Returns None when the column is full; that is the caller's normal
    /// game-over signal, not an error. Out-of-range columns also yield None
    /// (callers validate range first when the distinction matters).
    pub fn lowest_empty_row(&self, col: i8) -> Option<i8> {
        if col < 0 || col >= GRID_COLS as i8 {
            return None;
        }
        (0..GRID_ROWS as i8)
            .rev()
            .find(|&row| matches!(self.get(col, row), Some(None)))
    }

    /// Write a value into an empty cell. Returns false if the cell is out of
    /// bounds or occupied; no other side effect.
    pub fn place(&mut self, col: i8, row: i8, value: u32) -> bool {
        match Self::index(col, row) {
            Some(idx) if self.cells[idx].is_none() => {
                debug_assert!(value.is_power_of_two() && value >= 2);
                self.cells[idx] = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Flood-fill the 4-connected closure of equal-valued cells around the
    /// anchor. Returns None if the anchor is empty/out of bounds or the
    /// closure has no second member (a lone block never "merges").
    pub fn find_merge_group_from(&self, col: i8, row: i8) -> Option<MergeGroup> {
        let start = Self::index(col, row)?;
        let value = self.cells[start]?;

        // Explicit BFS queue; bounded by board size, no recursion.
        let mut visited = [false; GRID_SIZE];
        let mut queue: ArrayVec<(i8, i8), GRID_SIZE> = ArrayVec::new();
        let mut cells: ArrayVec<(i8, i8), GRID_SIZE> = ArrayVec::new();

        visited[start] = true;
        queue.push((col, row));
        cells.push((col, row));

        let mut head = 0;
        while head < queue.len() {
            let (c, r) = queue[head];
            head += 1;

            for (dc, dr) in NEIGHBORS_4 {
                let (nc, nr) = (c + dc, r + dr);
                let Some(idx) = Self::index(nc, nr) else {
                    continue;
                };
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;
                if self.cells[idx] == Some(value) {
                    queue.push((nc, nr));
                    cells.push((nc, nr));
                }
            }
        }

        if cells.len() < 2 {
            return None;
        }

        Some(MergeGroup {
            anchor_col: col,
            anchor_row: row,
            value,
            cells,
        })
    }

    /// Scan the whole board for the first mergeable cluster, bottom row
    /// first, then left-to-right within a row. Used for chain reactions
    /// after gravity, when no anchor position is known. The scan order is
    /// the resolution-order policy, not an accident.
    pub fn find_any_merge_group(&self) -> Option<MergeGroup> {
        for row in (0..GRID_ROWS as i8).rev() {
            for col in 0..GRID_COLS as i8 {
                if let Some(group) = self.find_merge_group_from(col, row) {
                    return Some(group);
                }
            }
        }
        None
    }

    /// Commit a merge: every cell in the group is emptied except the anchor,
    /// which receives the doubled value. Returns the new value.
    ///
    /// The write is a single pass over the group; no intermediate state is
    /// observable between clearing members and doubling the anchor.
    pub fn commit_merge(&mut self, group: &MergeGroup) -> u32 {
        debug_assert!(group.len() >= 2);
        let new_value = group.value * 2;

        for &(col, row) in &group.cells {
            debug_assert_eq!(self.get(col, row), Some(Some(group.value)));
            self.set(col, row, None);
        }
        self.set(group.anchor_col, group.anchor_row, Some(new_value));

        new_value
    }

    /// Compact every column downward, preserving top-to-bottom order and
    /// leaving no gaps. Each column is treated as a unit: collect its values,
    /// then rewrite it bottom-up. Restores the no-floating-blocks invariant.
    pub fn apply_gravity(&mut self) {
        for col in 0..GRID_COLS as i8 {
            let mut stack: ArrayVec<u32, { GRID_ROWS as usize }> = ArrayVec::new();
            for row in 0..GRID_ROWS as i8 {
                if let Some(Some(value)) = self.get(col, row) {
                    stack.push(value);
                    self.set(col, row, None);
                }
            }

            let mut row = GRID_ROWS as i8 - 1;
            for &value in stack.iter().rev() {
                self.set(col, row, Some(value));
                row -= 1;
            }
        }
    }

    /// True if some occupied cell sits directly above an empty one.
    /// Any true result after a completed gravity pass indicates corruption.
    pub fn has_floating_blocks(&self) -> bool {
        for col in 0..GRID_COLS as i8 {
            for row in 0..GRID_ROWS as i8 - 1 {
                if self.is_occupied(col, row) && matches!(self.get(col, row + 1), Some(None)) {
                    return true;
                }
            }
        }
        false
    }

    /// Defensive re-compaction. Returns true if anything was out of place;
    /// callers should treat a true result as anomalous.
    pub fn heal_floating_blocks(&mut self) -> bool {
        if self.has_floating_blocks() {
            self.apply_gravity();
            return true;
        }
        false
    }

    /// Game-over predicate: every cell of the top (spawn) row is occupied.
    pub fn is_top_row_filled(&self) -> bool {
        (0..GRID_COLS as i8).all(|col| self.is_occupied(col, 0))
    }

    /// Row of the first block holding `value` in a column, scanning top-down.
    /// Used to re-locate a merge survivor after gravity moved it.
    pub fn find_value_in_col(&self, col: i8, value: u32) -> Option<i8> {
        (0..GRID_ROWS as i8).find(|&row| self.get(col, row) == Some(Some(value)))
    }

    /// Largest block value on the board (0 if empty)
    pub fn max_value(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// All distinct block values, sorted ascending
    pub fn unique_values(&self) -> Vec<u32> {
        let mut values: Vec<u32> = self.cells.iter().flatten().copied().collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    pub fn has_blocks(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_some())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Item: delete a block and let the column settle.
    /// Returns false if the cell is empty or out of bounds.
    pub fn remove_block(&mut self, col: i8, row: i8) -> bool {
        if !self.is_occupied(col, row) {
            return false;
        }
        self.set(col, row, None);
        self.apply_gravity();
        true
    }

    /// Item: halve a block's value in place. Only applies to values above 2
    /// (a 2 cannot split); occupancy is unchanged so no gravity is needed.
    /// Returns the new value on success.
    pub fn split_block(&mut self, col: i8, row: i8) -> Option<u32> {
        let value = self.get(col, row)??;
        if value <= 2 {
            return None;
        }
        let new_value = value / 2;
        self.set(col, row, Some(new_value));
        Some(new_value)
    }

    /// Item: lift a block off the board (column settles behind it).
    /// Returns the lifted value.
    pub fn pickup_block(&mut self, col: i8, row: i8) -> Option<u32> {
        let value = self.get(col, row)??;
        self.set(col, row, None);
        self.apply_gravity();
        Some(value)
    }

    /// Item: redistribute all block values at random, packed column-major
    /// from the leftmost column upward from the bottom row.
    /// Returns false if the board is empty.
    pub fn shuffle(&mut self, rng: &mut SimpleRng) -> bool {
        let mut values: Vec<u32> = Vec::with_capacity(GRID_SIZE);
        for row in 0..GRID_ROWS as i8 {
            for col in 0..GRID_COLS as i8 {
                if let Some(Some(value)) = self.get(col, row) {
                    values.push(value);
                    self.set(col, row, None);
                }
            }
        }

        if values.is_empty() {
            return false;
        }

        rng.shuffle(&mut values);

        let mut next = 0;
        'fill: for col in 0..GRID_COLS as i8 {
            for row in (0..GRID_ROWS as i8).rev() {
                if next >= values.len() {
                    break 'fill;
                }
                self.set(col, row, Some(values[next]));
                next += 1;
            }
        }

        true
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rebuild the grid from a flat cells array (save/load, undo)
    pub fn load_cells(&mut self, cells: [Cell; GRID_SIZE]) {
        self.cells = cells;
    }

    /// Copy out the flat cells array
    pub fn to_cells(&self) -> [Cell; GRID_SIZE] {
        self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [None; GRID_SIZE];
    }

}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

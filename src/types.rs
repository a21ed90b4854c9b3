//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Grid dimensions. Row 0 is the top (spawn) row, row `GRID_ROWS - 1` the
/// bottom; column index increases left-to-right.
pub const GRID_COLS: u8 = 5;
pub const GRID_ROWS: u8 = 8;

/// Values a fresh (or non-dynamic) board can spawn.
pub const START_VALUES: [u32; 2] = [2, 4];

/// Combo multiplier 1.5 expressed as an integer ratio (floored on apply)
pub const COMBO_NUMERATOR: u32 = 3;
pub const COMBO_DENOMINATOR: u32 = 2;

/// Board max value must exceed this before dynamic drop widens the pool.
pub const DYNAMIC_DROP_THRESHOLD: u32 = 4;

/// Spawn bias weights (percent rolls).
/// Easy skews toward the upper half of the candidate set; hard skews toward
/// the minimum candidate. Normal is uniform.
pub const EASY_UPPER_BIAS_PCT: u32 = 60;
pub const HARD_MIN_BIAS_PCT: u32 = 70;

/// A cell holds a power-of-two block value, or nothing.
pub type Cell = Option<u32>;

/// Difficulty setting. Higher difficulty restricts dynamic drops to smaller
/// values relative to the board's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Dynamic-drop divisor: candidates go up to `max_value / divisor`.
    pub fn divisor(&self) -> u32 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 8,
            Difficulty::Hard => 16,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

/// Gameplay settings, passed explicitly into the spawn policy and the merge
/// resolver (no ambient/global settings store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Whole-board fallback scan after the anchor chain is exhausted.
    pub chain_merge: bool,
    /// Widen the spawn pool once the board's max value grows.
    pub dynamic_drop: bool,
    pub difficulty: Difficulty,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            chain_merge: true,
            dynamic_drop: true,
            difficulty: Difficulty::Normal,
        }
    }
}

/// Items the player can activate. Bomb, split, and pickup need a grid target;
/// shuffle and undo apply immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Bomb,
    Split,
    Shuffle,
    Pickup,
    Undo,
}

impl ItemKind {
    pub fn needs_target(&self) -> bool {
        matches!(self, ItemKind::Bomb | ItemKind::Split | ItemKind::Pickup)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Bomb => "bomb",
            ItemKind::Split => "split",
            ItemKind::Shuffle => "shuffle",
            ItemKind::Pickup => "pickup",
            ItemKind::Undo => "undo",
        }
    }
}

/// Why a request was refused. Neither variant indicates a bug:
/// `Invalid` is a malformed request (out-of-range coordinate, empty cell
/// where a block is required); `NotApplicable` is a well-formed request the
/// current state does not permit (undo with no snapshot, split on a 2,
/// drop while a cascade is being finalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Invalid,
    NotApplicable,
}

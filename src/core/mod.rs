//! Core module - pure game logic with no external dependencies
//!
//! This module contains all the game rules, state management, and logic.
//! It has zero dependencies on UI, networking, or I/O.

pub mod grid;
pub mod merge;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawn;

// Re-export commonly used types
pub use grid::{Grid, MergeGroup, GRID_SIZE};
pub use merge::{resolve_cascade, CascadeResult, MergeStep};
pub use rng::SimpleRng;
pub use scoring::{cascade_score, merge_score};
pub use session::{DropResult, GameSession, ItemOutcome, TargetOutcome};
pub use snapshot::Snapshot;
pub use spawn::{SpawnQueue, LOOKAHEAD};

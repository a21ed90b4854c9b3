//! NumberDrop - a falling-block number-merging puzzle engine.
//!
//! The simulation core lives in [`core`]: grid, flood-fill merge resolution,
//! spawn policy, and the session state machine. [`adapter`] holds the
//! serialization boundary (saved games) and the leaderboard store/server.

pub mod adapter;
pub mod core;
pub mod types;

//! Adapter module - serialization and network boundary
//!
//! Everything serde and tokio lives here; the core stays free of I/O.
//! Covers the saved-game JSON shape and the leaderboard store/server.

pub mod leaderboard;
pub mod protocol;
pub mod server;

// Re-export protocol types
pub use leaderboard::LeaderboardStore;
pub use protocol::*;
pub use server::{run_server, ServerConfig};

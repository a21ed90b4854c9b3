//! TCP server for the leaderboard
//!
//! Line-delimited JSON over TCP: one request per line, one response per
//! line, same order. The store sits behind an `RwLock` so concurrent
//! read-only queries never serialize against each other; only submits
//! take the write lock. Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;

use crate::adapter::leaderboard::{LeaderboardStore, DEFAULT_TOP_LIMIT};
use crate::adapter::protocol::{
    ErrorResponse, LeaderboardRequest, RankForScoreResponse, RankResponse, StatsResponse,
    SubmitResponse,
};

type SharedStore = Arc<RwLock<LeaderboardStore>>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("NUMBERDROP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("NUMBERDROP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7777);

        Self { host, port }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Bind and serve until the process exits.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let store: SharedStore = Arc::new(RwLock::new(LeaderboardStore::new()));
    let listener = TcpListener::bind(config.socket_addr()?).await?;
    log::info!("leaderboard listening on {}:{}", config.host, config.port);

    loop {
        let (stream, peer) = listener.accept().await?;
        log::info!("client connected: {peer}");
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, store).await {
                log::warn!("client {peer} error: {e}");
            }
            log::info!("client disconnected: {peer}");
        });
    }
}

async fn handle_client(stream: TcpStream, store: SharedStore) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch(&line, &store).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

/// Serialize a response; infallible for our types.
fn encode<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("response encoding failed: {e}");
        r#"{"error":"internal"}"#.to_string()
    })
}

fn error(message: &str) -> String {
    encode(&ErrorResponse {
        error: message.to_string(),
    })
}

async fn dispatch(line: &str, store: &SharedStore) -> String {
    let request: LeaderboardRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            log::warn!("bad request: {e}");
            return error("Malformed request");
        }
    };

    match request {
        LeaderboardRequest::Submit {
            user_id,
            score,
            username,
        } => {
            // The backend rejects empty ids and zero scores at the route.
            if user_id.is_empty() || score == 0 {
                return error("Missing required fields");
            }
            let outcome = store
                .write()
                .await
                .submit(&user_id, score, username.as_deref());
            encode(&SubmitResponse {
                rank: outcome.rank,
                is_new_best: outcome.is_new_best,
            })
        }
        LeaderboardRequest::Top { limit } => {
            // A zero limit means "default", as the route's parse fallback did.
            let limit = limit.filter(|&l| l > 0).unwrap_or(DEFAULT_TOP_LIMIT);
            let entries = store.read().await.top(limit);
            encode(&entries)
        }
        LeaderboardRequest::Rank { user_id } => {
            let rank = store.read().await.rank(&user_id);
            encode(&RankResponse { rank })
        }
        LeaderboardRequest::RankForScore { score } => {
            let store = store.read().await;
            encode(&RankForScoreResponse {
                rank: store.rank_for_score(score),
                total_players: store.total_players(),
            })
        }
        LeaderboardRequest::Stats => {
            let total_players = store.read().await.total_players();
            encode(&StatsResponse { total_players })
        }
    }
}

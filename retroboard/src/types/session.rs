//! UserSession - a participant's membership on one board

use super::ids::{BoardId, UserHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A participant joined to a board, unique on `(board_id, user_hash)`.
/// Stored under `sessions/{user_hash}.json`, so the uniqueness is structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub board_id: BoardId,
    pub user_hash: UserHash,
    pub alias: String,
    pub joined_at: DateTime<Utc>,
}

impl UserSession {
    /// Create a new session
    pub fn new(board_id: BoardId, user_hash: UserHash, alias: impl Into<String>) -> Self {
        Self {
            board_id,
            user_hash,
            alias: alias.into(),
            joined_at: Utc::now(),
        }
    }
}

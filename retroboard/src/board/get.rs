//! GetBoard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::BoardId;
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fetch a board with its cards and sessions. Read-only, unlogged, never
/// blocked by writers.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    /// The board to fetch
    pub board_id: BoardId,
}

impl GetBoard {
    /// Create a new GetBoard command
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for GetBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let board = ctx.read_board(&self.board_id).await?;
        let cards = ctx.read_all_cards(&self.board_id).await?;
        let sessions = ctx.read_all_sessions(&self.board_id).await?;

        Ok(serde_json::json!({
            "board": board,
            "cards": cards,
            "sessions": sessions,
        }))
    }

    fn op_string(&self) -> &'static str {
        "get board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }

    fn logged(&self) -> bool {
        false
    }
}

//! ClearBoard command

use super::clear_entities;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::BoardId;
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delete every card, reaction and session on a board. Works on active and
/// closed boards alike and never changes the board state.
#[derive(Debug, Deserialize, Serialize)]
pub struct ClearBoard {
    /// The board to clear
    pub board_id: BoardId,
}

impl ClearBoard {
    /// Create a new ClearBoard command
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for ClearBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        // The guard already proved the board directory exists; reading the
        // board keeps a torn directory from passing as success
        ctx.read_board(&self.board_id).await?;

        let (cards, reactions, sessions) = clear_entities(ctx, &self.board_id).await?;
        tracing::info!(
            board = %self.board_id,
            cards,
            reactions,
            sessions,
            "board cleared"
        );

        Ok(serde_json::json!({
            "cards_removed": cards,
            "reactions_removed": reactions,
            "sessions_removed": sessions,
        }))
    }

    fn op_string(&self) -> &'static str {
        "clear board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

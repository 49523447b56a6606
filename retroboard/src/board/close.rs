//! CloseBoard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, UserHash};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Close a board, stopping new cards, reactions and joins. Only admins may
/// close; re-closing an already closed board is a harmless no-op.
#[derive(Debug, Deserialize, Serialize)]
pub struct CloseBoard {
    /// The board to close
    pub board_id: BoardId,
    /// Resolved identity of the requesting user
    pub actor_hash: UserHash,
}

impl CloseBoard {
    /// Create a new CloseBoard command
    pub fn new(board_id: impl Into<BoardId>, actor_hash: impl Into<UserHash>) -> Self {
        Self {
            board_id: board_id.into(),
            actor_hash: actor_hash.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for CloseBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut board = ctx.read_board(&self.board_id).await?;
        if !board.is_admin(&self.actor_hash) {
            return Err(RetroError::NotAdmin {
                board_id: self.board_id.to_string(),
                user_hash: self.actor_hash.to_string(),
            });
        }

        if !board.is_closed() {
            board.close();
            ctx.write_board(&board).await?;
            tracing::info!(board = %board.id, "board closed");
        }

        Ok(serde_json::to_value(&board)?)
    }

    fn op_string(&self) -> &'static str {
        "close board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

//! ResetBoard command

use super::clear_entities;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::BoardId;
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Clear a board and, when it was closed, reopen it. An already-active board
/// is cleared and left active - reopening is conditional, not forced.
#[derive(Debug, Deserialize, Serialize)]
pub struct ResetBoard {
    /// The board to reset
    pub board_id: BoardId,
}

impl ResetBoard {
    /// Create a new ResetBoard command
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for ResetBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut board = ctx.read_board(&self.board_id).await?;

        let (cards, reactions, sessions) = clear_entities(ctx, &self.board_id).await?;

        let reopened = board.is_closed();
        if reopened {
            board.reopen();
            ctx.write_board(&board).await?;
        }

        tracing::info!(board = %self.board_id, reopened, "board reset");

        Ok(serde_json::json!({
            "board": board,
            "reopened": reopened,
            "cards_removed": cards,
            "reactions_removed": reactions,
            "sessions_removed": sessions,
        }))
    }

    fn op_string(&self) -> &'static str {
        "reset board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CloseBoard, CreateBoard};
    use crate::card::AddCard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));
        let created = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(created["id"].as_str().unwrap());
        (temp, ctx, board_id)
    }

    #[tokio::test]
    async fn test_reset_closed_board_reopens() {
        let (_temp, ctx, board_id) = setup().await;

        AddCard::new(board_id.clone(), "went-well", "note", "u1")
            .execute(&ctx)
            .await
            .unwrap();
        CloseBoard::new(board_id.clone(), "facilitator")
            .execute(&ctx)
            .await
            .unwrap();

        let result = ResetBoard::new(board_id.clone()).execute(&ctx).await.unwrap();
        assert_eq!(result["reopened"], true);
        assert_eq!(result["cards_removed"], 1);
        assert_eq!(result["board"]["state"], "active");
        assert!(result["board"].get("closed_at").is_none());

        let board = ctx.read_board(&board_id).await.unwrap();
        assert!(!board.is_closed());
        assert!(board.closed_at.is_none());
        assert!(ctx.list_card_ids(&board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_active_board_stays_active() {
        let (_temp, ctx, board_id) = setup().await;

        let result = ResetBoard::new(board_id).execute(&ctx).await.unwrap();
        assert_eq!(result["reopened"], false);
        assert_eq!(result["board"]["state"], "active");
    }

    #[tokio::test]
    async fn test_reset_missing_board() {
        let (_temp, ctx, _board_id) = setup().await;

        let result = ResetBoard::new(BoardId::new()).execute(&ctx).await;
        assert!(matches!(result, Err(RetroError::BoardNotFound { .. })));
    }
}

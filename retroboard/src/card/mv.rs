//! MoveCard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId, ColumnId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move a card to a different column. Changes the column only - the card's
/// links and counts are untouched.
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveCard {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card to move
    pub card_id: CardId,
    /// The target column
    pub column_id: ColumnId,
}

impl MoveCard {
    /// Create a new MoveCard command
    pub fn new(
        board_id: impl Into<BoardId>,
        card_id: impl Into<CardId>,
        column_id: impl Into<ColumnId>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            card_id: card_id.into(),
            column_id: column_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for MoveCard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;

        if board.find_column(&self.column_id).is_none() {
            return Err(RetroError::ColumnNotFound {
                id: self.column_id.to_string(),
            });
        }

        let mut card = ctx.read_card(&self.board_id, &self.card_id).await?;
        card.column_id = self.column_id.clone();
        ctx.write_card(&card).await?;

        Ok(serde_json::to_value(&card)?)
    }

    fn op_string(&self) -> &'static str {
        "move card"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::AddCard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId, CardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));
        let created = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(created["id"].as_str().unwrap());

        let card = AddCard::new(board_id.clone(), "went-well", "note", "u1")
            .execute(&ctx)
            .await
            .unwrap();
        let card_id = CardId::from_string(card["id"].as_str().unwrap());

        (temp, ctx, board_id, card_id)
    }

    #[tokio::test]
    async fn test_move_card() {
        let (_temp, ctx, board_id, card_id) = setup().await;

        let result = MoveCard::new(board_id, card_id, "action-items")
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["column_id"], "action-items");
    }

    #[tokio::test]
    async fn test_move_card_invalid_column() {
        let (_temp, ctx, board_id, card_id) = setup().await;

        let result = MoveCard::new(board_id, card_id, "nonexistent")
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(RetroError::ColumnNotFound { .. })));
    }
}

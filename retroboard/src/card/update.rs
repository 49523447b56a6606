//! UpdateCard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, Card, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Edit a card's content
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateCard {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card to edit
    pub card_id: CardId,
    /// Replacement content (1-5000 characters)
    pub content: String,
}

impl UpdateCard {
    /// Create a new UpdateCard command
    pub fn new(
        board_id: impl Into<BoardId>,
        card_id: impl Into<CardId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            card_id: card_id.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for UpdateCard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;
        Card::validate_content(&self.content)?;

        let mut card = ctx.read_card(&self.board_id, &self.card_id).await?;
        card.set_content(&self.content);
        ctx.write_card(&card).await?;

        Ok(serde_json::to_value(&card)?)
    }

    fn op_string(&self) -> &'static str {
        "update card"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

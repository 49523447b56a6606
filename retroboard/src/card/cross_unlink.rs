//! RemoveCrossLink command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remove the cross-link between two cards, from both sides. Removing a link
/// that does not exist is a harmless no-op.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveCrossLink {
    /// The board both cards live on
    pub board_id: BoardId,
    /// One end of the link
    pub card_a: CardId,
    /// The other end of the link
    pub card_b: CardId,
}

impl RemoveCrossLink {
    /// Create a new RemoveCrossLink command
    pub fn new(
        board_id: impl Into<BoardId>,
        card_a: impl Into<CardId>,
        card_b: impl Into<CardId>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            card_a: card_a.into(),
            card_b: card_b.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for RemoveCrossLink {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut a = ctx.read_card(&self.board_id, &self.card_a).await?;
        let mut b = ctx.read_card(&self.board_id, &self.card_b).await?;

        let removed = a.linked_feedback_ids.remove(&b.id);
        b.linked_feedback_ids.remove(&a.id);

        if removed {
            ctx.write_card(&a).await?;
            ctx.write_card(&b).await?;
        }

        Ok(serde_json::json!({
            "cards": [a, b],
            "removed": removed,
        }))
    }

    fn op_string(&self) -> &'static str {
        "unlink feedback"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::{AddCard, AddCrossLink};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId, CardId, CardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));
        let created = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(created["id"].as_str().unwrap());

        let a = AddCard::new(board_id.clone(), "went-well", "a", "author")
            .execute(&ctx)
            .await
            .unwrap();
        let a = CardId::from_string(a["id"].as_str().unwrap());
        let b = AddCard::new(board_id.clone(), "went-well", "b", "author")
            .execute(&ctx)
            .await
            .unwrap();
        let b = CardId::from_string(b["id"].as_str().unwrap());

        (temp, ctx, board_id, a, b)
    }

    #[tokio::test]
    async fn test_remove_cross_link_scrubs_both_sides() {
        let (_temp, ctx, board_id, a, b) = setup().await;

        AddCrossLink::new(board_id.clone(), a.clone(), b.clone())
            .execute(&ctx)
            .await
            .unwrap();

        let result = RemoveCrossLink::new(board_id.clone(), b.clone(), a.clone())
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(result["removed"], true);

        let card_a = ctx.read_card(&board_id, &a).await.unwrap();
        let card_b = ctx.read_card(&board_id, &b).await.unwrap();
        assert!(card_a.linked_feedback_ids.is_empty());
        assert!(card_b.linked_feedback_ids.is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_link_is_noop() {
        let (_temp, ctx, board_id, a, b) = setup().await;

        let result = RemoveCrossLink::new(board_id, a, b)
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(result["removed"], false);
    }
}

//! RemoveParentLink command

use super::aggregate::recompute_aggregation;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detach a card from its parent. The former parent's aggregate is
/// recomputed; a card without a parent is left unchanged.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveParentLink {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card to detach
    pub child_id: CardId,
}

impl RemoveParentLink {
    /// Create a new RemoveParentLink command
    pub fn new(board_id: impl Into<BoardId>, child_id: impl Into<CardId>) -> Self {
        Self {
            board_id: board_id.into(),
            child_id: child_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for RemoveParentLink {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut child = ctx.read_card(&self.board_id, &self.child_id).await?;

        let Some(former) = child.parent_card_id.take() else {
            return Ok(serde_json::json!({
                "child": child,
                "former_parent": Value::Null,
            }));
        };

        ctx.write_card(&child).await?;
        let former_parent = recompute_aggregation(ctx, &self.board_id, &former).await?;

        Ok(serde_json::json!({
            "child": child,
            "former_parent": former_parent,
        }))
    }

    fn op_string(&self) -> &'static str {
        "unlink cards"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::{AddCard, SetParentLink};
    use crate::reaction::AddReaction;
    use crate::types::ReactionType;
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

    async fn add_card(ctx: &RetroContext, board_id: &BoardId, content: &str) -> CardId {
        let result = AddCard::new(board_id.clone(), "went-well", content, "author")
            .execute(ctx)
            .await
            .unwrap();
        CardId::from_string(result["id"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_unlink_recomputes_former_parent() {
        let (_temp, ctx, board_id) = setup().await;
        let parent = add_card(&ctx, &board_id, "theme").await;
        let child = add_card(&ctx, &board_id, "detail").await;

        AddReaction::new(board_id.clone(), child.clone(), "u1", ReactionType::ThumbsUp)
            .execute(&ctx)
            .await
            .unwrap();
        SetParentLink::new(board_id.clone(), child.clone(), parent.clone())
            .execute(&ctx)
            .await
            .unwrap();

        let result = RemoveParentLink::new(board_id.clone(), child)
            .execute(&ctx)
            .await
            .unwrap();

        assert!(result["child"].get("parent_card_id").is_none());
        assert_eq!(result["former_parent"]["aggregated_reaction_count"], 0);

        let parent_card = ctx.read_card(&board_id, &parent).await.unwrap();
        assert_eq!(parent_card.aggregated_reaction_count, 0);
    }

    #[tokio::test]
    async fn test_unlink_without_parent_is_noop() {
        let (_temp, ctx, board_id) = setup().await;
        let card = add_card(&ctx, &board_id, "root").await;

        let result = RemoveParentLink::new(board_id, card)
            .execute(&ctx)
            .await
            .unwrap();
        assert!(result["former_parent"].is_null());
    }

    #[tokio::test]
    async fn test_unlink_missing_card() {
        let (_temp, ctx, board_id) = setup().await;

        let result = RemoveParentLink::new(board_id, CardId::new())
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(RetroError::CardNotFound { .. })));
    }
}

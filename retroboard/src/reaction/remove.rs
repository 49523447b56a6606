//! RemoveReaction command

use crate::card::recompute_aggregation;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId, ReactionType, UserHash};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Take back a reaction. Removing a reaction that was never placed is a
/// harmless no-op, not an error.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveReaction {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card the reaction sits on
    pub card_id: CardId,
    /// Resolved identity of the user taking the reaction back
    pub user_hash: UserHash,
    /// Which reaction to remove
    pub reaction_type: ReactionType,
}

impl RemoveReaction {
    /// Create a new RemoveReaction command
    pub fn new(
        board_id: impl Into<BoardId>,
        card_id: impl Into<CardId>,
        user_hash: impl Into<UserHash>,
        reaction_type: ReactionType,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            card_id: card_id.into(),
            user_hash: user_hash.into(),
            reaction_type,
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for RemoveReaction {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut card = ctx.read_card(&self.board_id, &self.card_id).await?;

        let Some(existing) = ctx
            .find_reaction(
                &self.board_id,
                &self.card_id,
                &self.user_hash,
                self.reaction_type,
            )
            .await?
        else {
            return Ok(serde_json::json!({
                "removed": false,
                "card": card,
                "parent": Value::Null,
            }));
        };

        ctx.delete_reaction_file(&self.board_id, &existing.id).await?;

        card.direct_reaction_count = card.direct_reaction_count.saturating_sub(1);
        ctx.write_card(&card).await?;

        let card = recompute_aggregation(ctx, &self.board_id, &self.card_id).await?;
        let parent = match &card.parent_card_id {
            Some(parent_id) => {
                Some(recompute_aggregation(ctx, &self.board_id, parent_id).await?)
            }
            None => None,
        };

        Ok(serde_json::json!({
            "removed": true,
            "card": card,
            "parent": parent,
        }))
    }

    fn op_string(&self) -> &'static str {
        "remove reaction"
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
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId, CardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));
        let created = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(created["id"].as_str().unwrap());

        let card = AddCard::new(board_id.clone(), "went-well", "note", "author")
            .execute(&ctx)
            .await
            .unwrap();
        let card_id = CardId::from_string(card["id"].as_str().unwrap());

        (temp, ctx, board_id, card_id)
    }

    #[tokio::test]
    async fn test_remove_reaction() {
        let (_temp, ctx, board_id, card_id) = setup().await;

        AddReaction::new(board_id.clone(), card_id.clone(), "u1", ReactionType::ThumbsUp)
            .execute(&ctx)
            .await
            .unwrap();

        let result = RemoveReaction::new(board_id.clone(), card_id, "u1", ReactionType::ThumbsUp)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["removed"], true);
        assert_eq!(result["card"]["direct_reaction_count"], 0);
        assert_eq!(result["card"]["aggregated_reaction_count"], 0);
        assert!(ctx.read_all_reactions(&board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_reaction_is_noop() {
        let (_temp, ctx, board_id, card_id) = setup().await;

        let result = RemoveReaction::new(board_id, card_id, "u1", ReactionType::Heart)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["removed"], false);
        assert_eq!(result["card"]["direct_reaction_count"], 0);
    }

    #[tokio::test]
    async fn test_remove_updates_parent_aggregate() {
        let (_temp, ctx, board_id, child_id) = setup().await;

        let parent = AddCard::new(board_id.clone(), "went-well", "theme", "author")
            .execute(&ctx)
            .await
            .unwrap();
        let parent_id = CardId::from_string(parent["id"].as_str().unwrap());

        AddReaction::new(board_id.clone(), child_id.clone(), "u1", ReactionType::ThumbsUp)
            .execute(&ctx)
            .await
            .unwrap();
        SetParentLink::new(board_id.clone(), child_id.clone(), parent_id.clone())
            .execute(&ctx)
            .await
            .unwrap();

        let result =
            RemoveReaction::new(board_id, child_id, "u1", ReactionType::ThumbsUp)
                .execute(&ctx)
                .await
                .unwrap();

        assert_eq!(result["parent"]["aggregated_reaction_count"], 0);
    }
}

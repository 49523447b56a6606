//! DeleteCard command

use super::aggregate::recompute_aggregation;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::reaction::delete_by_cards;
use crate::types::{BoardId, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delete a card.
///
/// Children lose their parent and become roots with their aggregate reset to
/// their own direct count; cross-link partners are scrubbed; the card's
/// reactions are removed from the ledger; a former parent's aggregate is
/// recomputed.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCard {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card to delete
    pub card_id: CardId,
}

impl DeleteCard {
    /// Create a new DeleteCard command
    pub fn new(board_id: impl Into<BoardId>, card_id: impl Into<CardId>) -> Self {
        Self {
            board_id: board_id.into(),
            card_id: card_id.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for DeleteCard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let card = ctx.read_card(&self.board_id, &self.card_id).await?;
        let all_cards = ctx.read_all_cards(&self.board_id).await?;

        // Children become roots; without children their aggregate is just
        // their own direct count
        let mut orphaned = Vec::new();
        for child in &all_cards {
            if child.parent_card_id.as_ref() == Some(&self.card_id) {
                let mut child = child.clone();
                child.parent_card_id = None;
                child.aggregated_reaction_count = child.direct_reaction_count;
                ctx.write_card(&child).await?;
                orphaned.push(child.id.clone());
            }
        }

        // Scrub the symmetric cross-links from every partner
        for partner_id in &card.linked_feedback_ids {
            let mut partner = ctx.read_card(&self.board_id, partner_id).await?;
            partner.linked_feedback_ids.remove(&self.card_id);
            ctx.write_card(&partner).await?;
        }

        let reactions_removed =
            delete_by_cards(ctx, &self.board_id, std::slice::from_ref(&self.card_id)).await?;

        ctx.delete_card_file(&self.board_id, &self.card_id).await?;

        // Recompute the former parent now that this card no longer counts
        if let Some(parent_id) = &card.parent_card_id {
            recompute_aggregation(ctx, &self.board_id, parent_id).await?;
        }

        Ok(serde_json::json!({
            "deleted": true,
            "card_id": self.card_id,
            "reactions_removed": reactions_removed,
            "orphaned_children": orphaned,
            "former_parent": card.parent_card_id,
        }))
    }

    fn op_string(&self) -> &'static str {
        "delete card"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::card::{AddCard, AddCrossLink, SetParentLink};
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
    async fn test_delete_parent_orphans_children() {
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

        let result = DeleteCard::new(board_id.clone(), parent.clone())
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(result["orphaned_children"][0], child.as_str());

        assert!(matches!(
            ctx.read_card(&board_id, &parent).await,
            Err(RetroError::CardNotFound { .. })
        ));
        let child_card = ctx.read_card(&board_id, &child).await.unwrap();
        assert!(child_card.parent_card_id.is_none());
        assert_eq!(child_card.aggregated_reaction_count, 1);
    }

    #[tokio::test]
    async fn test_delete_child_recomputes_parent() {
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

        let parent_card = ctx.read_card(&board_id, &parent).await.unwrap();
        assert_eq!(parent_card.aggregated_reaction_count, 1);

        DeleteCard::new(board_id.clone(), child)
            .execute(&ctx)
            .await
            .unwrap();

        let parent_card = ctx.read_card(&board_id, &parent).await.unwrap();
        assert_eq!(parent_card.aggregated_reaction_count, 0);
    }

    #[tokio::test]
    async fn test_delete_scrubs_cross_links_and_reactions() {
        let (_temp, ctx, board_id) = setup().await;
        let a = add_card(&ctx, &board_id, "a").await;
        let b = add_card(&ctx, &board_id, "b").await;

        AddCrossLink::new(board_id.clone(), a.clone(), b.clone())
            .execute(&ctx)
            .await
            .unwrap();
        AddReaction::new(board_id.clone(), a.clone(), "u1", ReactionType::Heart)
            .execute(&ctx)
            .await
            .unwrap();

        let result = DeleteCard::new(board_id.clone(), a)
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(result["reactions_removed"], 1);

        let partner = ctx.read_card(&board_id, &b).await.unwrap();
        assert!(partner.linked_feedback_ids.is_empty());
        assert!(ctx.read_all_reactions(&board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_card() {
        let (_temp, ctx, board_id) = setup().await;

        let result = DeleteCard::new(board_id, CardId::new()).execute(&ctx).await;
        assert!(matches!(result, Err(RetroError::CardNotFound { .. })));
    }
}

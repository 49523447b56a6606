//! AddReaction command

use crate::card::recompute_aggregation;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId, Reaction, ReactionType, UserHash};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Place a reaction on a card.
///
/// At most one reaction per `(card, user, type)`: repeating an existing
/// reaction is an upsert that changes nothing. A newly stored reaction bumps
/// the card's direct count and synchronously recomputes the card's aggregate
/// and its parent's, so the response never carries a count that will be
/// corrected later.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddReaction {
    /// The board the card lives on
    pub board_id: BoardId,
    /// The card being reacted to
    pub card_id: CardId,
    /// Resolved identity of the reacting user
    pub user_hash: UserHash,
    /// Which reaction to place
    pub reaction_type: ReactionType,
}

impl AddReaction {
    /// Create a new AddReaction command
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
impl Execute<RetroContext, RetroError> for AddReaction {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;

        let mut card = ctx.read_card(&self.board_id, &self.card_id).await?;

        let reactions = ctx.read_all_reactions(&self.board_id).await?;
        if let Some(existing) = reactions
            .iter()
            .find(|r| r.matches_key(&self.card_id, &self.user_hash, self.reaction_type))
        {
            return Ok(serde_json::json!({
                "reaction": existing,
                "card": card,
                "created": false,
            }));
        }

        // The limit counts distinct reactions by this user across the whole
        // board, before insert
        let placed_by_user = reactions
            .iter()
            .filter(|r| r.user_hash == self.user_hash)
            .count();
        board.assert_reaction_capacity(placed_by_user)?;

        let reaction = Reaction::new(
            self.card_id.clone(),
            self.user_hash.clone(),
            self.reaction_type,
        );
        ctx.write_reaction(&self.board_id, &reaction).await?;

        card.direct_reaction_count += 1;
        ctx.write_card(&card).await?;

        let card = recompute_aggregation(ctx, &self.board_id, &self.card_id).await?;
        let parent = match &card.parent_card_id {
            Some(parent_id) => {
                Some(recompute_aggregation(ctx, &self.board_id, parent_id).await?)
            }
            None => None,
        };

        Ok(serde_json::json!({
            "reaction": reaction,
            "card": card,
            "parent": parent,
            "created": true,
        }))
    }

    fn op_string(&self) -> &'static str {
        "add reaction"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

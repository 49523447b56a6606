//! SetParentLink command

use super::aggregate::recompute_aggregation;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, Card, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Make one card the parent of another.
///
/// The parent relation is a depth-1 forest: a card is a root, a parent, or a
/// child - never parent and child at once. Every structural check runs
/// against the current persisted state under the board's writer lock, so two
/// concurrent links cannot both pass validation against a stale snapshot.
#[derive(Debug, Deserialize, Serialize)]
pub struct SetParentLink {
    /// The board both cards live on
    pub board_id: BoardId,
    /// The card gaining a parent
    pub child_id: CardId,
    /// The card becoming the parent
    pub parent_id: CardId,
}

impl SetParentLink {
    /// Create a new SetParentLink command
    pub fn new(
        board_id: impl Into<BoardId>,
        child_id: impl Into<CardId>,
        parent_id: impl Into<CardId>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            child_id: child_id.into(),
            parent_id: parent_id.into(),
        }
    }
}

/// Walk `parent_card_id` pointers from `start`, failing if the chain reaches
/// `target`. Bounded by the board's card count so a corrupt chain still
/// terminates.
fn assert_no_cycle(all_cards: &[Card], start: &CardId, target: &CardId) -> Result<()> {
    let by_id: HashMap<&CardId, &Card> = all_cards.iter().map(|c| (&c.id, c)).collect();

    let mut current = Some(start);
    for _ in 0..=all_cards.len() {
        let Some(id) = current else {
            return Ok(());
        };
        if id == target {
            return Err(RetroError::CircularRelationship {
                child: target.to_string(),
                parent: start.to_string(),
            });
        }
        current = by_id.get(id).and_then(|c| c.parent_card_id.as_ref());
    }

    // Chain longer than the card count can only mean an existing cycle
    Err(RetroError::CircularRelationship {
        child: target.to_string(),
        parent: start.to_string(),
    })
}

#[async_trait]
impl Execute<RetroContext, RetroError> for SetParentLink {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        if self.child_id == self.parent_id {
            return Err(RetroError::CircularRelationship {
                child: self.child_id.to_string(),
                parent: self.parent_id.to_string(),
            });
        }

        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut child = ctx.read_card(&self.board_id, &self.child_id).await?;
        let parent = ctx.read_card(&self.board_id, &self.parent_id).await?;

        // Parent/child and cross-link are mutually exclusive between a pair
        if child.is_linked_to(&self.parent_id) {
            return Err(RetroError::LinkConflict {
                a: self.child_id.to_string(),
                b: self.parent_id.to_string(),
            });
        }

        if parent.is_child() {
            return Err(RetroError::ParentCannotBeChild {
                id: self.parent_id.to_string(),
            });
        }

        let all_cards = ctx.read_all_cards(&self.board_id).await?;
        if child.has_children(&all_cards) {
            return Err(RetroError::ChildCannotBeParent {
                id: self.child_id.to_string(),
            });
        }

        assert_no_cycle(&all_cards, &self.parent_id, &self.child_id)?;

        let former_parent = child.parent_card_id.replace(self.parent_id.clone());
        ctx.write_card(&child).await?;

        let parent = recompute_aggregation(ctx, &self.board_id, &self.parent_id).await?;
        if let Some(former) = former_parent.filter(|id| id != &self.parent_id) {
            recompute_aggregation(ctx, &self.board_id, &former).await?;
        }

        Ok(serde_json::json!({
            "child": child,
            "parent": parent,
        }))
    }

    fn op_string(&self) -> &'static str {
        "link cards"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

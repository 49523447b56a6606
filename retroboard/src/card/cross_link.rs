//! AddCrossLink command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, CardId};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cross-link two cards as related feedback.
///
/// Cross-links are symmetric and non-hierarchical: they never aggregate
/// reaction counts, and a pair already in a parent/child relation cannot
/// also be cross-linked. Repeating an existing link is a harmless no-op.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCrossLink {
    /// The board both cards live on
    pub board_id: BoardId,
    /// One end of the link
    pub card_a: CardId,
    /// The other end of the link
    pub card_b: CardId,
}

impl AddCrossLink {
    /// Create a new AddCrossLink command
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
impl Execute<RetroContext, RetroError> for AddCrossLink {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        if self.card_a == self.card_b {
            return Err(RetroError::LinkConflict {
                a: self.card_a.to_string(),
                b: self.card_b.to_string(),
            });
        }

        let _guard = ctx.lock_board(&self.board_id).await?;

        let mut a = ctx.read_card(&self.board_id, &self.card_a).await?;
        let mut b = ctx.read_card(&self.board_id, &self.card_b).await?;

        if a.is_parent_or_child_of(&b) {
            return Err(RetroError::LinkConflict {
                a: self.card_a.to_string(),
                b: self.card_b.to_string(),
            });
        }

        let created = a.linked_feedback_ids.insert(b.id.clone());
        b.linked_feedback_ids.insert(a.id.clone());

        ctx.write_card(&a).await?;
        ctx.write_card(&b).await?;

        Ok(serde_json::json!({
            "cards": [a, b],
            "created": created,
        }))
    }

    fn op_string(&self) -> &'static str {
        "link feedback"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

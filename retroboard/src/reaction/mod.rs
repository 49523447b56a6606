//! Reaction ledger commands
//!
//! The ledger stores at most one reaction per `(card, user, type)` and keeps
//! each card's direct count in step with the stored reactions. Count changes
//! roll up to the card's parent synchronously with the triggering operation.

mod add;
mod remove;

pub use add::AddReaction;
pub use remove::RemoveReaction;

use crate::context::RetroContext;
use crate::error::Result;
use crate::types::{BoardId, CardId};

/// Remove every reaction on the given cards, returning how many were
/// deleted. Aggregates are NOT recomputed - callers are deleting the cards
/// themselves or wiping the whole board.
pub(crate) async fn delete_by_cards(
    ctx: &RetroContext,
    board_id: &BoardId,
    card_ids: &[CardId],
) -> Result<usize> {
    let reactions = ctx.read_all_reactions(board_id).await?;
    let mut removed = 0;

    for reaction in reactions {
        if card_ids.contains(&reaction.card_id) {
            ctx.delete_reaction_file(board_id, &reaction.id).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

//! Board maintenance commands: clear, reset, seed
//!
//! Bulk operations scoped to one board. They run under the board's writer
//! lock and treat zero affected rows as success, so they stay re-runnable
//! after a partial failure.

mod clear;
mod reset;
mod seed;

pub use clear::ClearBoard;
pub use reset::ResetBoard;
pub use seed::SeedBoard;

use crate::context::RetroContext;
use crate::error::Result;
use crate::reaction::delete_by_cards;
use crate::types::BoardId;

/// Delete every card, reaction and session on the board. Returns
/// `(cards, reactions, sessions)` removal counts. The board file itself is
/// untouched. Callers hold the board's writer lock.
pub(crate) async fn clear_entities(
    ctx: &RetroContext,
    board_id: &BoardId,
) -> Result<(usize, usize, usize)> {
    let card_ids = ctx.list_card_ids(board_id).await?;
    let reactions_removed = delete_by_cards(ctx, board_id, &card_ids).await?;

    for id in &card_ids {
        ctx.delete_card_file(board_id, id).await?;
    }

    let sessions = ctx.read_all_sessions(board_id).await?;
    for session in &sessions {
        ctx.delete_session_file(board_id, &session.user_hash).await?;
    }

    Ok((card_ids.len(), reactions_removed, sessions.len()))
}

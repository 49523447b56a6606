//! Aggregated reaction count recomputation
//!
//! The aggregate is always re-derived from the current persisted card set,
//! never maintained through incremental deltas. Fan-out per card is small
//! (typically under 20 children), so the extra reads stay cheap.

use crate::context::RetroContext;
use crate::error::Result;
use crate::types::{BoardId, Card, CardId};

/// The aggregate for one card over the given card set: its own direct count
/// plus the direct counts of every card whose parent pointer references it
pub(crate) fn aggregate_count(card: &Card, all_cards: &[Card]) -> u32 {
    card.direct_reaction_count
        + card
            .children(all_cards)
            .iter()
            .map(|c| c.direct_reaction_count)
            .sum::<u32>()
}

/// Re-derive and persist `aggregated_reaction_count` for one card from the
/// current persisted state. Returns the updated card.
///
/// Callers hold the board's writer lock.
pub(crate) async fn recompute_aggregation(
    ctx: &RetroContext,
    board_id: &BoardId,
    card_id: &CardId,
) -> Result<Card> {
    let mut card = ctx.read_card(board_id, card_id).await?;
    let all_cards = ctx.read_all_cards(board_id).await?;
    card.aggregated_reaction_count = aggregate_count(&card, &all_cards);
    ctx.write_card(&card).await?;
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardType, ColumnId, UserHash};

    fn card(board: &BoardId, direct: u32) -> Card {
        let mut c = Card::new(
            board.clone(),
            ColumnId::from_string("went-well"),
            "note",
            CardType::Feedback,
            false,
            UserHash::from("u1"),
            None,
        );
        c.direct_reaction_count = direct;
        c
    }

    #[test]
    fn test_aggregate_is_direct_plus_children() {
        let board = BoardId::new();
        let parent = card(&board, 2);
        let mut child_a = card(&board, 3);
        child_a.parent_card_id = Some(parent.id.clone());
        let mut child_b = card(&board, 5);
        child_b.parent_card_id = Some(parent.id.clone());

        let all = vec![parent.clone(), child_a, child_b];
        assert_eq!(aggregate_count(&parent, &all), 10);
    }

    #[test]
    fn test_aggregate_of_leaf_is_direct_count() {
        let board = BoardId::new();
        let leaf = card(&board, 4);
        let all = vec![leaf.clone()];
        assert_eq!(aggregate_count(&leaf, &all), 4);
    }

    #[test]
    fn test_cross_links_do_not_aggregate() {
        let board = BoardId::new();
        let mut a = card(&board, 1);
        let b = card(&board, 7);
        a.linked_feedback_ids.insert(b.id.clone());

        let all = vec![a.clone(), b];
        assert_eq!(aggregate_count(&a, &all), 1);
    }
}

//! Card types: Card, CardType

use super::ids::{BoardId, CardId, ColumnId, UserHash};
use crate::error::{RetroError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Content length bounds, in characters
pub const MIN_CONTENT_CHARS: usize = 1;
pub const MAX_CONTENT_CHARS: usize = 5000;

/// What kind of item a card records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Feedback,
    Action,
}

/// A feedback or action card on a board.
///
/// Cards form a depth-1 forest through `parent_card_id` (a card is a root,
/// a parent, or a child - never parent and child at once) and may carry
/// symmetric, non-hierarchical cross-links in `linked_feedback_ids`.
/// `aggregated_reaction_count` is always `direct_reaction_count` plus the
/// direct counts of the card's children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub content: String,
    pub card_type: CardType,
    pub is_anonymous: bool,
    pub created_by_hash: UserHash,
    /// Absent when the card is anonymous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Parent pointer - foreign key into the board's card set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_card_id: Option<CardId>,
    /// Cross-linked related feedback, kept symmetric on both sides
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub linked_feedback_ids: BTreeSet<CardId>,
    #[serde(default)]
    pub direct_reaction_count: u32,
    #[serde(default)]
    pub aggregated_reaction_count: u32,
}

impl Card {
    /// Create a new root card with zero counts. The author alias is dropped
    /// when the card is anonymous.
    pub fn new(
        board_id: BoardId,
        column_id: ColumnId,
        content: impl Into<String>,
        card_type: CardType,
        is_anonymous: bool,
        created_by_hash: UserHash,
        created_by_alias: Option<String>,
    ) -> Self {
        Self {
            id: CardId::new(),
            board_id,
            column_id,
            content: content.into(),
            card_type,
            is_anonymous,
            created_by_hash,
            created_by_alias: if is_anonymous { None } else { created_by_alias },
            created_at: Utc::now(),
            updated_at: None,
            parent_card_id: None,
            linked_feedback_ids: BTreeSet::new(),
            direct_reaction_count: 0,
            aggregated_reaction_count: 0,
        }
    }

    /// Validate content bounds (1-5000 characters)
    pub fn validate_content(content: &str) -> Result<()> {
        let chars = content.chars().count();
        if chars < MIN_CONTENT_CHARS {
            return Err(RetroError::invalid_value("content", "must not be empty"));
        }
        if chars > MAX_CONTENT_CHARS {
            return Err(RetroError::invalid_value(
                "content",
                format!("exceeds {MAX_CONTENT_CHARS} characters"),
            ));
        }
        Ok(())
    }

    /// Check whether this card has a parent
    pub fn is_child(&self) -> bool {
        self.parent_card_id.is_some()
    }

    /// Cards in `all_cards` whose parent pointer references this card
    pub fn children<'a>(&self, all_cards: &'a [Card]) -> Vec<&'a Card> {
        all_cards
            .iter()
            .filter(|c| c.parent_card_id.as_ref() == Some(&self.id))
            .collect()
    }

    /// Check whether any card in `all_cards` points at this card as parent
    pub fn has_children(&self, all_cards: &[Card]) -> bool {
        all_cards
            .iter()
            .any(|c| c.parent_card_id.as_ref() == Some(&self.id))
    }

    /// Check whether this card is cross-linked to the other
    pub fn is_linked_to(&self, other: &CardId) -> bool {
        self.linked_feedback_ids.contains(other)
    }

    /// Check whether this card and the other are in a parent/child relation,
    /// in either direction
    pub fn is_parent_or_child_of(&self, other: &Card) -> bool {
        self.parent_card_id.as_ref() == Some(&other.id)
            || other.parent_card_id.as_ref() == Some(&self.id)
    }

    /// Record a content edit
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(board: &BoardId) -> Card {
        Card::new(
            board.clone(),
            ColumnId::from_string("went-well"),
            "The demo went smoothly",
            CardType::Feedback,
            false,
            UserHash::from("author"),
            Some("Dana".into()),
        )
    }

    #[test]
    fn test_new_card_is_root_with_zero_counts() {
        let board = BoardId::new();
        let c = card(&board);
        assert!(c.parent_card_id.is_none());
        assert!(c.linked_feedback_ids.is_empty());
        assert_eq!(c.direct_reaction_count, 0);
        assert_eq!(c.aggregated_reaction_count, 0);
        assert_eq!(c.created_by_alias.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_anonymous_card_drops_alias() {
        let c = Card::new(
            BoardId::new(),
            ColumnId::from_string("went-well"),
            "quietly noted",
            CardType::Feedback,
            true,
            UserHash::from("author"),
            Some("Dana".into()),
        );
        assert!(c.is_anonymous);
        assert!(c.created_by_alias.is_none());
    }

    #[test]
    fn test_content_bounds() {
        assert!(Card::validate_content("x").is_ok());
        assert!(matches!(
            Card::validate_content(""),
            Err(RetroError::InvalidValue { .. })
        ));
        let long = "x".repeat(MAX_CONTENT_CHARS);
        assert!(Card::validate_content(&long).is_ok());
        let too_long = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert!(matches!(
            Card::validate_content(&too_long),
            Err(RetroError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_children_scan() {
        let board = BoardId::new();
        let parent = card(&board);
        let mut child_a = card(&board);
        child_a.parent_card_id = Some(parent.id.clone());
        let mut child_b = card(&board);
        child_b.parent_card_id = Some(parent.id.clone());
        let unrelated = card(&board);

        let all = vec![
            parent.clone(),
            child_a.clone(),
            child_b.clone(),
            unrelated.clone(),
        ];
        let children = parent.children(&all);
        assert_eq!(children.len(), 2);
        assert!(parent.has_children(&all));
        assert!(!unrelated.has_children(&all));
        assert!(child_a.is_child());
        assert!(child_a.is_parent_or_child_of(&parent));
        assert!(parent.is_parent_or_child_of(&child_a));
        assert!(!parent.is_parent_or_child_of(&unrelated));
    }

    #[test]
    fn test_set_content_touches_updated_at() {
        let mut c = card(&BoardId::new());
        assert!(c.updated_at.is_none());
        c.set_content("Revised wording");
        assert_eq!(c.content, "Revised wording");
        assert!(c.updated_at.is_some());
    }

    #[test]
    fn test_card_serialization_omits_empty_graph_fields() {
        let c = card(&BoardId::new());
        let json = serde_json::to_string_pretty(&c).unwrap();
        assert!(!json.contains("parent_card_id"));
        assert!(!json.contains("linked_feedback_ids"));

        let parsed: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.content, c.content);
        assert!(parsed.linked_feedback_ids.is_empty());
    }
}

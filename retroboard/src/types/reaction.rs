//! Reaction types: Reaction, ReactionType

use super::ids::{CardId, ReactionId, UserHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of reactions a participant can place on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionType {
    ThumbsUp,
    Heart,
    Celebrate,
    Thinking,
}

impl ReactionType {
    /// Every reaction type, in display order
    pub const ALL: [ReactionType; 4] = [
        ReactionType::ThumbsUp,
        ReactionType::Heart,
        ReactionType::Celebrate,
        ReactionType::Thinking,
    ];
}

/// A single stored reaction, unique on `(card_id, user_hash, reaction_type)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub card_id: CardId,
    pub user_hash: UserHash,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new reaction
    pub fn new(card_id: CardId, user_hash: UserHash, reaction_type: ReactionType) -> Self {
        Self {
            id: ReactionId::new(),
            card_id,
            user_hash,
            reaction_type,
            created_at: Utc::now(),
        }
    }

    /// Check against the ledger uniqueness key
    pub fn matches_key(
        &self,
        card_id: &CardId,
        user_hash: &UserHash,
        reaction_type: ReactionType,
    ) -> bool {
        &self.card_id == card_id
            && &self.user_hash == user_hash
            && self.reaction_type == reaction_type
    }
}

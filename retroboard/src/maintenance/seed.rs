//! SeedBoard command

use crate::alias::generate_alias;
use crate::card::aggregate_count;
use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, Card, CardType, Reaction, ReactionType, UserHash, UserSession};
use rand::Rng;
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

const SEED_PHRASES: &[&str] = &[
    "Pairing on the migration saved us a day",
    "Standups kept drifting past fifteen minutes",
    "The release checklist caught a bad config",
    "Review turnaround was slow this sprint",
    "On-call handoff notes were excellent",
    "Too many meetings on Wednesday afternoons",
    "The new dashboard made triage easier",
    "Flaky integration tests burned a lot of time",
    "Customer feedback loop felt tighter",
    "Scope changed twice after planning",
];

/// Populate a board with generated sessions, cards and reactions.
///
/// Everything is generated in memory first, then bulk-written under the
/// board's writer lock, so the result satisfies the same invariants as if
/// each entity had been created through the single-item commands.
#[derive(Debug, Deserialize, Serialize)]
pub struct SeedBoard {
    /// The board to populate
    pub board_id: BoardId,
    /// How many participant sessions to create
    #[serde(default)]
    pub num_users: usize,
    /// How many cards to create, spread round-robin across columns
    #[serde(default)]
    pub num_cards: usize,
    /// How many of the cards are action items (the rest are feedback)
    #[serde(default)]
    pub num_action_cards: usize,
    /// How many reactions to request; distinct `(user, card)` pairs cap the
    /// number actually created
    #[serde(default)]
    pub num_reactions: usize,
    /// Group generated cards into parent/child triples
    #[serde(default)]
    pub create_relationships: bool,
}

impl SeedBoard {
    /// Create a new SeedBoard command with nothing to generate
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
            num_users: 0,
            num_cards: 0,
            num_action_cards: 0,
            num_reactions: 0,
            create_relationships: false,
        }
    }

    /// Set the number of participant sessions
    pub fn with_users(mut self, num_users: usize) -> Self {
        self.num_users = num_users;
        self
    }

    /// Set the number of cards, and how many of them are action items
    pub fn with_cards(mut self, num_cards: usize, num_action_cards: usize) -> Self {
        self.num_cards = num_cards;
        self.num_action_cards = num_action_cards;
        self
    }

    /// Set the number of reactions to request
    pub fn with_reactions(mut self, num_reactions: usize) -> Self {
        self.num_reactions = num_reactions;
        self
    }

    /// Group generated cards into parent/child triples
    pub fn with_relationships(mut self) -> Self {
        self.create_relationships = true;
        self
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for SeedBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        if self.num_action_cards > self.num_cards {
            return Err(RetroError::invalid_value(
                "num_action_cards",
                "cannot exceed num_cards",
            ));
        }

        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;

        // The thread-local RNG is not `Send`; confine it to a block so it is
        // dropped before any await and the generated future stays `Send` as
        // the async trait requires.
        let (sessions, mut cards, reactions, relationships) = {
        let mut rng = rand::rng();

        // Participant sessions with distinct aliases
        let mut taken = HashSet::new();
        let mut sessions = Vec::with_capacity(self.num_users);
        for _ in 0..self.num_users {
            let alias = generate_alias(&mut rng, &taken);
            taken.insert(alias.clone());
            let user_hash = UserHash::from_string(format!("seed-{}", ulid::Ulid::new()));
            sessions.push(UserSession::new(self.board_id.clone(), user_hash, alias));
        }

        // Cards spread round-robin across the board's columns. Type
        // assignment is positional; anonymity is an independent coin flip.
        let mut cards = Vec::with_capacity(self.num_cards);
        for i in 0..self.num_cards {
            let column = &board.columns[i % board.columns.len()];
            let card_type = if i < self.num_action_cards {
                CardType::Action
            } else {
                CardType::Feedback
            };
            let is_anonymous = rng.random_bool(0.2);
            let (author_hash, author_alias) = if sessions.is_empty() {
                (board.created_by_hash.clone(), None)
            } else {
                let session = &sessions[rng.random_range(0..sessions.len())];
                (session.user_hash.clone(), Some(session.alias.clone()))
            };

            let phrase = SEED_PHRASES[i % SEED_PHRASES.len()];
            let content = if i < SEED_PHRASES.len() {
                phrase.to_string()
            } else {
                format!("{} ({})", phrase, i / SEED_PHRASES.len() + 1)
            };

            cards.push(Card::new(
                self.board_id.clone(),
                column.id.clone(),
                content,
                card_type,
                is_anonymous,
                author_hash,
                author_alias,
            ));
        }

        // Parent/child triples: the first card of each complete group of
        // three becomes the parent of the other two
        let mut relationships = 0;
        if self.create_relationships {
            for group in 0..self.num_cards / 3 {
                let parent_id = cards[group * 3].id.clone();
                cards[group * 3 + 1].parent_card_id = Some(parent_id.clone());
                cards[group * 3 + 2].parent_card_id = Some(parent_id);
                relationships += 1;
            }
        }

        // Reactions drawn as random (user, card) pairs, deduplicated to the
        // ledger key; requesting more than the distinct pairs silently
        // yields fewer
        let mut reactions = Vec::new();
        if !cards.is_empty() && !sessions.is_empty() {
            let mut seen_pairs = HashSet::new();
            for _ in 0..self.num_reactions {
                let card_index = rng.random_range(0..cards.len());
                let user_index = rng.random_range(0..sessions.len());
                if seen_pairs.insert((card_index, user_index)) {
                    let reaction_type =
                        ReactionType::ALL[rng.random_range(0..ReactionType::ALL.len())];
                    reactions.push(Reaction::new(
                        cards[card_index].id.clone(),
                        sessions[user_index].user_hash.clone(),
                        reaction_type,
                    ));
                    cards[card_index].direct_reaction_count += 1;
                }
            }
        }

        (sessions, cards, reactions, relationships)
        };

        // Aggregates derived exactly as the single-item path would leave them
        let snapshot = cards.clone();
        for card in &mut cards {
            card.aggregated_reaction_count = aggregate_count(card, &snapshot);
        }

        // Bulk writes
        for session in &sessions {
            ctx.write_session(session).await?;
        }
        for card in &cards {
            ctx.write_card(card).await?;
        }
        for reaction in &reactions {
            ctx.write_reaction(&self.board_id, reaction).await?;
        }

        tracing::info!(
            board = %self.board_id,
            users = sessions.len(),
            cards = cards.len(),
            reactions = reactions.len(),
            relationships,
            "board seeded"
        );

        Ok(serde_json::json!({
            "users_created": sessions.len(),
            "cards_created": cards.len(),
            "reactions_created": reactions.len(),
            "relationships_created": relationships,
        }))
    }

    fn op_string(&self) -> &'static str {
        "seed board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

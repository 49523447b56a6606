//! Retrospective board engine with file-backed storage
//!
//! This crate implements the core of a team retrospective tool: boards hold
//! columns, columns hold cards, cards link into a per-board relationship
//! graph, and reactions roll up through that graph. All data is stored as
//! JSON files under a storage root, one directory per board, with per-board
//! writer locks for concurrent access.
//!
//! ## Overview
//!
//! - **Depth-1 card forest** - a card is a root, a parent, or a child; never
//!   parent and child at once. Cycle and depth checks run on every link
//!   against the current persisted state.
//! - **Synchronous aggregation** - a parent card's displayed count is its own
//!   reactions plus its children's, recomputed from scratch whenever a link
//!   or reaction changes. Responses never carry a stale count.
//! - **Reaction ledger** - at most one reaction per `(card, user, type)`;
//!   re-reacting is an upsert.
//! - **Per-board serialization** - mutating commands take a lazily created
//!   per-board lock (in-process mutex + advisory file lock); reads never
//!   block on writers.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use retroboard::{RetroContext, Execute};
//! use retroboard::board::CreateBoard;
//! use retroboard::card::AddCard;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = RetroContext::new("/var/lib/retroboard");
//!
//! let board = CreateBoard::new("Sprint 12 Retro", "facilitator-hash")
//!     .with_creator_alias("Sam")
//!     .execute(&ctx)
//!     .await?;
//! let board_id = board["id"].as_str().unwrap();
//!
//! let card = AddCard::new(board_id, "went-well", "Demo went great", "user-hash")
//!     .execute(&ctx)
//!     .await?;
//!
//! println!("Created card: {}", card["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! <root>/
//! ├── activity/
//! │   └── current.jsonl            # Global operation log
//! └── boards/
//!     └── {board_id}/
//!         ├── board.json           # Board metadata + columns
//!         ├── .lock                # Advisory writer lock
//!         ├── cards/{id}.json
//!         ├── reactions/{id}.json
//!         ├── sessions/{user_hash}.json
//!         └── activity/current.jsonl   # Per-board operation log
//! ```
//!
//! Entity state files use pretty-printed JSON. Operation logs use JSONL
//! (one JSON object per line, newest first when read back).

mod alias;
mod context;
mod error;
pub mod types;

// Command modules
pub mod board;
pub mod card;
pub mod maintenance;
pub mod reaction;

// Re-export the operations layer
pub use retroboard_operations::{
    async_trait, ActivitySink, Execute, LogEntry, OperationProcessor, Value,
};

pub use context::{BoardGuard, RetroContext};
pub use error::{RetroError, Result};

// Re-export commonly used types
pub use types::{
    Board, BoardId, BoardState, Card, CardId, CardType, Column, ColumnId, Reaction, ReactionId,
    ReactionType, UserHash, UserSession,
};

//! Board-level types: Board, Column, BoardState

use super::ids::{BoardId, ColumnId, UserHash};
use crate::error::{RetroError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Boards support at most this many columns
pub const MAX_COLUMNS: usize = 10;

/// Whether a board accepts mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardState {
    Active,
    Closed,
}

/// A retrospective board: ordered columns plus participation limits.
/// Cards, reactions and sessions are stored as individual files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Ordered workflow columns, 1 to [`MAX_COLUMNS`]
    pub columns: Vec<Column>,
    pub state: BoardState,
    /// Cap on cards a single user may create, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_limit_per_user: Option<u32>,
    /// Cap on reactions a single user may place across the board, when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_limit_per_user: Option<u32>,
    pub created_by_hash: UserHash,
    /// Users allowed to close the board
    pub admins: BTreeSet<UserHash>,
    pub created_at: DateTime<Utc>,
    /// Set iff `state` is `Closed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Create a new active board with default columns; the creator is the
    /// sole admin.
    pub fn new(name: impl Into<String>, created_by: UserHash) -> Self {
        let mut admins = BTreeSet::new();
        admins.insert(created_by.clone());
        Self {
            id: BoardId::new(),
            name: name.into(),
            columns: Self::default_columns(),
            state: BoardState::Active,
            card_limit_per_user: None,
            reaction_limit_per_user: None,
            created_by_hash: created_by,
            admins,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    /// Replace the default columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the per-user card limit
    pub fn with_card_limit(mut self, limit: u32) -> Self {
        self.card_limit_per_user = Some(limit);
        self
    }

    /// Set the per-user reaction limit
    pub fn with_reaction_limit(mut self, limit: u32) -> Self {
        self.reaction_limit_per_user = Some(limit);
        self
    }

    /// Get the default columns for a new board
    pub fn default_columns() -> Vec<Column> {
        vec![
            Column {
                id: ColumnId::from_string("went-well"),
                name: "Went Well".into(),
                color: Some("2e7d32".into()),
            },
            Column {
                id: ColumnId::from_string("to-improve"),
                name: "To Improve".into(),
                color: Some("c62828".into()),
            },
            Column {
                id: ColumnId::from_string("action-items"),
                name: "Action Items".into(),
                color: Some("1565c0".into()),
            },
        ]
    }

    /// Find a column by id
    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Check whether the user may close this board
    pub fn is_admin(&self, user_hash: &UserHash) -> bool {
        self.admins.contains(user_hash)
    }

    /// Check whether the board is closed
    pub fn is_closed(&self) -> bool {
        self.state == BoardState::Closed
    }

    /// Transition to closed. No-op when already closed, preserving the
    /// original `closed_at`.
    pub fn close(&mut self) {
        if self.state == BoardState::Active {
            self.state = BoardState::Closed;
            self.closed_at = Some(Utc::now());
        }
    }

    /// Transition back to active. Only the reset maintenance operation calls
    /// this; it is never exposed as a bare user action.
    pub(crate) fn reopen(&mut self) {
        self.state = BoardState::Active;
        self.closed_at = None;
    }

    /// Fail with `BoardClosed` unless the board accepts mutations
    pub fn assert_active(&self) -> Result<()> {
        if self.is_closed() {
            return Err(RetroError::BoardClosed {
                id: self.id.to_string(),
            });
        }
        Ok(())
    }

    /// Fail with `CardLimitReached` when the user is at their card cap
    pub fn assert_card_capacity(&self, current_for_user: usize) -> Result<()> {
        if let Some(limit) = self.card_limit_per_user {
            if current_for_user >= limit as usize {
                return Err(RetroError::CardLimitReached { limit });
            }
        }
        Ok(())
    }

    /// Fail with `ReactionLimitReached` when the user is at their reaction cap
    pub fn assert_reaction_capacity(&self, current_for_user: usize) -> Result<()> {
        if let Some(limit) = self.reaction_limit_per_user {
            if current_for_user >= limit as usize {
                return Err(RetroError::ReactionLimitReached { limit });
            }
        }
        Ok(())
    }
}

/// A column is a named bucket cards are placed into
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    /// 6-character hex color code without #
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Column {
    /// Create a new column with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ColumnId::new(),
            name: name.into(),
            color: None,
        }
    }

    /// Set the column color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

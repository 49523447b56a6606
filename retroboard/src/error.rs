//! Error types for the retroboard engine

use thiserror::Error;

/// Result type for retroboard operations
pub type Result<T> = std::result::Result<T, RetroError>;

/// Errors that can occur in retroboard operations
#[derive(Debug, Error)]
pub enum RetroError {
    /// Board not found
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Card not found
    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// Column not found on the board
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Board is closed and rejects mutations
    #[error("board is closed: {id}")]
    BoardClosed { id: String },

    /// Actor is not a board admin
    #[error("user {user_hash} is not an admin of board {board_id}")]
    NotAdmin {
        board_id: String,
        user_hash: String,
    },

    /// Per-user card limit reached
    #[error("card limit reached: {limit} cards per user")]
    CardLimitReached { limit: u32 },

    /// Per-user reaction limit reached
    #[error("reaction limit reached: {limit} reactions per user")]
    ReactionLimitReached { limit: u32 },

    /// Linking the cards would create a cycle in the parent relation
    #[error("linking card {child} under {parent} would create a cycle")]
    CircularRelationship { child: String, parent: String },

    /// The card already has children and cannot itself become a child
    #[error("card {id} has linked children and cannot become a child")]
    ChildCannotBeParent { id: String },

    /// The card already has a parent and cannot itself become a parent
    #[error("card {id} already has a parent and cannot become a parent")]
    ParentCannotBeChild { id: String },

    /// The two cards are already related in a way that excludes this link
    #[error("conflicting relationship between cards {a} and {b}")]
    LinkConflict { a: String, b: String },

    /// Too many columns for one board
    #[error("boards support at most {max} columns, got {count}")]
    TooManyColumns { count: usize, max: usize },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Another writer holds the board lock
    #[error("board lock busy - another operation in progress")]
    LockBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetroError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable code for the HTTP layer to map onto its error responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::BoardNotFound { .. } => "BOARD_NOT_FOUND",
            Self::CardNotFound { .. } => "CARD_NOT_FOUND",
            Self::ColumnNotFound { .. } => "COLUMN_NOT_FOUND",
            Self::BoardClosed { .. } => "BOARD_CLOSED",
            Self::NotAdmin { .. } => "NOT_ADMIN",
            Self::CardLimitReached { .. } => "CARD_LIMIT_REACHED",
            Self::ReactionLimitReached { .. } => "REACTION_LIMIT_REACHED",
            Self::CircularRelationship { .. } => "CIRCULAR_RELATIONSHIP",
            Self::ChildCannotBeParent { .. } => "CHILD_CANNOT_BE_PARENT",
            Self::ParentCannotBeChild { .. } => "PARENT_CANNOT_BE_CHILD",
            Self::LinkConflict { .. } => "LINK_CONFLICT",
            Self::TooManyColumns { .. } | Self::InvalidValue { .. } => "VALIDATION",
            Self::LockBusy => "LOCK_BUSY",
            Self::Io(_) | Self::Json(_) => "INTERNAL",
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

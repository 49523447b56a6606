//! CreateBoard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{Board, Column, UserHash, UserSession, MAX_COLUMNS};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Create a new retrospective board
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// The board name
    pub name: String,
    /// Columns for the board; defaults apply when empty
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Cap on cards per user
    pub card_limit_per_user: Option<u32>,
    /// Cap on reactions per user
    pub reaction_limit_per_user: Option<u32>,
    /// Resolved creator identity - becomes the sole admin
    pub created_by_hash: UserHash,
    /// When set, a session is created for the creator under this alias
    pub creator_alias: Option<String>,
}

impl CreateBoard {
    /// Create a new CreateBoard command
    pub fn new(name: impl Into<String>, created_by: impl Into<UserHash>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            card_limit_per_user: None,
            reaction_limit_per_user: None,
            created_by_hash: created_by.into(),
            creator_alias: None,
        }
    }

    /// Set custom columns
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

    /// Join the creator immediately under this alias
    pub fn with_creator_alias(mut self, alias: impl Into<String>) -> Self {
        self.creator_alias = Some(alias.into());
        self
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for CreateBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        if self.name.trim().is_empty() {
            return Err(RetroError::invalid_value("name", "must not be empty"));
        }
        if self.columns.len() > MAX_COLUMNS {
            return Err(RetroError::TooManyColumns {
                count: self.columns.len(),
                max: MAX_COLUMNS,
            });
        }
        let distinct: BTreeSet<_> = self.columns.iter().map(|c| &c.id).collect();
        if distinct.len() != self.columns.len() {
            return Err(RetroError::invalid_value("columns", "duplicate column id"));
        }

        let mut board = Board::new(&self.name, self.created_by_hash.clone());
        if !self.columns.is_empty() {
            board = board.with_columns(self.columns.clone());
        }
        if let Some(limit) = self.card_limit_per_user {
            board = board.with_card_limit(limit);
        }
        if let Some(limit) = self.reaction_limit_per_user {
            board = board.with_reaction_limit(limit);
        }

        ctx.create_board_directories(&board.id).await?;
        ctx.write_board(&board).await?;

        let mut result = serde_json::to_value(&board)?;
        if let Some(alias) = &self.creator_alias {
            let session =
                UserSession::new(board.id.clone(), self.created_by_hash.clone(), alias);
            ctx.write_session(&session).await?;
            result["creator_session"] = serde_json::to_value(&session)?;
        }

        tracing::info!(board = %board.id, name = %board.name, "board created");
        Ok(result)
    }

    fn op_string(&self) -> &'static str {
        "create board"
    }
}

//! JoinBoard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, UserHash, UserSession};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Join a board as a participant. Joining again under a new alias replaces
/// the previous session (one session per user per board).
#[derive(Debug, Deserialize, Serialize)]
pub struct JoinBoard {
    /// The board to join
    pub board_id: BoardId,
    /// Resolved participant identity
    pub user_hash: UserHash,
    /// Display alias for this board
    pub alias: String,
}

impl JoinBoard {
    /// Create a new JoinBoard command
    pub fn new(
        board_id: impl Into<BoardId>,
        user_hash: impl Into<UserHash>,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            user_hash: user_hash.into(),
            alias: alias.into(),
        }
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for JoinBoard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        if self.alias.trim().is_empty() {
            return Err(RetroError::invalid_value("alias", "must not be empty"));
        }

        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;

        let session = UserSession::new(
            self.board_id.clone(),
            self.user_hash.clone(),
            &self.alias,
        );
        ctx.write_session(&session).await?;

        Ok(serde_json::to_value(&session)?)
    }

    fn op_string(&self) -> &'static str {
        "join board"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CloseBoard, CreateBoard};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));
        let created = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(created["id"].as_str().unwrap());
        (temp, ctx, board_id)
    }

    #[tokio::test]
    async fn test_join_board() {
        let (_temp, ctx, board_id) = setup().await;

        let result = JoinBoard::new(board_id.clone(), "u1", "Quiet Fox")
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(result["alias"], "Quiet Fox");

        let sessions = ctx.read_all_sessions(&board_id).await.unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_rejoin_replaces_session() {
        let (_temp, ctx, board_id) = setup().await;

        JoinBoard::new(board_id.clone(), "u1", "Quiet Fox")
            .execute(&ctx)
            .await
            .unwrap();
        JoinBoard::new(board_id.clone(), "u1", "Loud Fox")
            .execute(&ctx)
            .await
            .unwrap();

        let sessions = ctx.read_all_sessions(&board_id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].alias, "Loud Fox");
    }

    #[tokio::test]
    async fn test_join_closed_board() {
        let (_temp, ctx, board_id) = setup().await;

        CloseBoard::new(board_id.clone(), "facilitator")
            .execute(&ctx)
            .await
            .unwrap();

        let result = JoinBoard::new(board_id, "u1", "Quiet Fox")
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(RetroError::BoardClosed { .. })));
    }
}

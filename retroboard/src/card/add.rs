//! AddCard command

use crate::context::RetroContext;
use crate::error::{RetroError, Result};
use crate::types::{BoardId, Card, CardType, ColumnId, UserHash};
use retroboard_operations::{async_trait, Execute};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a new card to a board column
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCard {
    /// The target board
    pub board_id: BoardId,
    /// The column the card lands in
    pub column_id: ColumnId,
    /// Card content (1-5000 characters)
    pub content: String,
    /// Feedback or action item
    pub card_type: CardType,
    /// Hide the author alias from other participants
    #[serde(default)]
    pub is_anonymous: bool,
    /// Resolved author identity
    pub author_hash: UserHash,
    /// Author display alias, when known
    pub author_alias: Option<String>,
}

impl AddCard {
    /// Create a new AddCard command
    pub fn new(
        board_id: impl Into<BoardId>,
        column_id: impl Into<ColumnId>,
        content: impl Into<String>,
        author_hash: impl Into<UserHash>,
    ) -> Self {
        Self {
            board_id: board_id.into(),
            column_id: column_id.into(),
            content: content.into(),
            card_type: CardType::Feedback,
            is_anonymous: false,
            author_hash: author_hash.into(),
            author_alias: None,
        }
    }

    /// Set the card type
    pub fn with_card_type(mut self, card_type: CardType) -> Self {
        self.card_type = card_type;
        self
    }

    /// Make the card anonymous
    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self
    }

    /// Set the author alias
    pub fn with_author_alias(mut self, alias: impl Into<String>) -> Self {
        self.author_alias = Some(alias.into());
        self
    }
}

#[async_trait]
impl Execute<RetroContext, RetroError> for AddCard {
    async fn execute(&self, ctx: &RetroContext) -> Result<Value> {
        let _guard = ctx.lock_board(&self.board_id).await?;

        let board = ctx.read_board(&self.board_id).await?;
        board.assert_active()?;
        Card::validate_content(&self.content)?;

        if board.find_column(&self.column_id).is_none() {
            return Err(RetroError::ColumnNotFound {
                id: self.column_id.to_string(),
            });
        }

        let cards = ctx.read_all_cards(&self.board_id).await?;
        let authored = cards
            .iter()
            .filter(|c| c.created_by_hash == self.author_hash)
            .count();
        board.assert_card_capacity(authored)?;

        let card = Card::new(
            self.board_id.clone(),
            self.column_id.clone(),
            self.content.clone(),
            self.card_type,
            self.is_anonymous,
            self.author_hash.clone(),
            self.author_alias.clone(),
        );

        ctx.write_card(&card).await?;
        Ok(serde_json::to_value(&card)?)
    }

    fn op_string(&self) -> &'static str {
        "add card"
    }

    fn scope(&self) -> Option<String> {
        Some(self.board_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, RetroContext, BoardId) {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));

        let result = CreateBoard::new("Retro", "facilitator")
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(result["id"].as_str().unwrap());

        (temp, ctx, board_id)
    }

    #[tokio::test]
    async fn test_add_card() {
        let (_temp, ctx, board_id) = setup().await;

        let result = AddCard::new(board_id.clone(), "went-well", "Demo went great", "u1")
            .with_author_alias("Robin")
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["content"], "Demo went great");
        assert_eq!(result["column_id"], "went-well");
        assert_eq!(result["card_type"], "feedback");
        assert_eq!(result["created_by_alias"], "Robin");
        assert_eq!(result["direct_reaction_count"], 0);
        assert_eq!(result["aggregated_reaction_count"], 0);
        assert!(result.get("parent_card_id").is_none());
    }

    #[tokio::test]
    async fn test_add_anonymous_card_hides_alias() {
        let (_temp, ctx, board_id) = setup().await;

        let result = AddCard::new(board_id, "went-well", "quiet note", "u1")
            .with_author_alias("Robin")
            .anonymous()
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["is_anonymous"], true);
        assert!(result.get("created_by_alias").is_none());
    }

    #[tokio::test]
    async fn test_add_card_unknown_column() {
        let (_temp, ctx, board_id) = setup().await;

        let result = AddCard::new(board_id, "nonexistent", "note", "u1")
            .execute(&ctx)
            .await;

        assert!(matches!(result, Err(RetroError::ColumnNotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_card_empty_content() {
        let (_temp, ctx, board_id) = setup().await;

        let result = AddCard::new(board_id, "went-well", "", "u1")
            .execute(&ctx)
            .await;

        assert!(matches!(result, Err(RetroError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_add_card_respects_per_user_limit() {
        let temp = TempDir::new().unwrap();
        let ctx = RetroContext::new(temp.path().join("retro"));

        let result = CreateBoard::new("Retro", "facilitator")
            .with_card_limit(1)
            .execute(&ctx)
            .await
            .unwrap();
        let board_id = BoardId::from_string(result["id"].as_str().unwrap());

        AddCard::new(board_id.clone(), "went-well", "first", "u1")
            .execute(&ctx)
            .await
            .unwrap();

        let second = AddCard::new(board_id.clone(), "went-well", "second", "u1")
            .execute(&ctx)
            .await;
        assert!(matches!(
            second,
            Err(RetroError::CardLimitReached { limit: 1 })
        ));

        // The limit is per user, not per board
        let other_user = AddCard::new(board_id, "went-well", "third", "u2")
            .execute(&ctx)
            .await;
        assert!(other_user.is_ok());
    }

    #[tokio::test]
    async fn test_add_card_closed_board() {
        let (_temp, ctx, board_id) = setup().await;

        let mut board = ctx.read_board(&board_id).await.unwrap();
        board.close();
        ctx.write_board(&board).await.unwrap();

        let result = AddCard::new(board_id, "went-well", "late note", "u1")
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(RetroError::BoardClosed { .. })));
    }
}

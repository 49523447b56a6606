//! The Execute trait - the contract every operation implements

use async_trait::async_trait;
use serde_json::Value;

/// An executable operation against a context.
///
/// Implementors are plain structs whose fields are the operation parameters.
/// `execute` returns the updated entity set as JSON so the transport layer
/// can broadcast it verbatim, or a named error.
#[async_trait]
pub trait Execute<C, E>: Send + Sync {
    /// Run the operation against the given context.
    async fn execute(&self, ctx: &C) -> Result<Value, E>;

    /// Canonical op string for the activity log (e.g., "add card").
    fn op_string(&self) -> &'static str;

    /// Scope for activity routing - the board id for board-scoped operations.
    fn scope(&self) -> Option<String> {
        None
    }

    /// Whether this operation should appear in the activity log.
    /// Read-only operations return false.
    fn logged(&self) -> bool {
        true
    }
}

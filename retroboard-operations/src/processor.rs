//! OperationProcessor - runs operations and records their activity log entries

use crate::log::LogEntry;
use crate::operation::Execute;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Destination for activity log entries.
///
/// The engine context implements this by appending to the JSONL activity
/// log of the board named in `entry.scope`.
#[async_trait]
pub trait ActivitySink<E> {
    /// Append an entry to the activity log.
    async fn record_activity(&self, entry: &LogEntry) -> Result<(), E>;
}

/// Runs operations and appends their log entries to the context's activity
/// sink, attaching actor attribution.
#[derive(Debug, Default)]
pub struct OperationProcessor {
    actor: Option<String>,
}

impl OperationProcessor {
    /// A processor with no actor attribution
    pub fn new() -> Self {
        Self { actor: None }
    }

    /// A processor attributing operations to the given actor.
    /// Format: "user_id" or "agent_name[session_id]".
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// Execute the operation, then record it in the activity log unless the
    /// operation is read-only. Logging failures are surfaced only for
    /// successful operations; a failed operation's own error wins.
    pub async fn process<C, E, O>(&self, op: &O, ctx: &C) -> Result<Value, E>
    where
        C: ActivitySink<E> + Sync,
        O: Execute<C, E> + Serialize + Sync,
        E: std::fmt::Display,
    {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(op).unwrap_or(Value::Null);

        let result = op.execute(ctx).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if op.logged() {
            let output = match &result {
                Ok(value) => value.clone(),
                Err(error) => serde_json::json!({ "error": error.to_string() }),
            };
            let entry = LogEntry::new(
                op.op_string(),
                op.scope(),
                input,
                output,
                self.actor.clone(),
                duration_ms,
            );
            match &result {
                Ok(_) => ctx.record_activity(&entry).await?,
                // Best effort: the operation already failed, keep its error
                Err(_) => {
                    let _ = ctx.record_activity(&entry).await;
                }
            }
        }

        result
    }
}

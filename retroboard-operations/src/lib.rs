//! # Retroboard Operations
//!
//! This crate provides the `Execute` trait for defining board operations.
//! Operations are structs where the fields ARE the parameters - no duplication.
//!
//! ## Example
//!
//! ```ignore
//! use retroboard_operations::*;
//!
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddCard {
//!     /// The card content
//!     pub content: String,
//! }
//!
//! #[async_trait]
//! impl Execute<RetroContext, RetroError> for AddCard {
//!     async fn execute(&self, ctx: &RetroContext) -> Result<Value, RetroError> {
//!         // read, validate, write, return the entity as JSON
//!     }
//!
//!     fn op_string(&self) -> &'static str {
//!         "add card"
//!     }
//! }
//! ```
//!
//! Mutating operations are recorded in a JSONL activity log when run through
//! the [`OperationProcessor`]; read-only operations opt out via
//! [`Execute::logged`].

mod log;
mod operation;
mod processor;

pub use log::LogEntry;
pub use operation::Execute;
pub use processor::{ActivitySink, OperationProcessor};

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;

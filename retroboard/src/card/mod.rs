//! Card graph commands
//!
//! Cards form a per-board graph: a depth-1 parent/child forest that rolls
//! reaction counts up to the parent, plus symmetric cross-links between
//! related feedback that never aggregate. Every mutation validates the
//! relationship invariants against the current persisted state under the
//! board's writer lock.

mod add;
mod aggregate;
mod cross_link;
mod cross_unlink;
mod delete;
mod link;
mod mv;
mod unlink;
mod update;

pub use add::AddCard;
pub use cross_link::AddCrossLink;
pub use cross_unlink::RemoveCrossLink;
pub use delete::DeleteCard;
pub use link::SetParentLink;
pub use mv::MoveCard;
pub use unlink::RemoveParentLink;
pub use update::UpdateCard;

pub(crate) use aggregate::{aggregate_count, recompute_aggregation};

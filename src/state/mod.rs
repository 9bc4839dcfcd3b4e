//! Shared crawl state
//!
//! # Components
//!
//! - `VisitStateMap`: per-URL lifecycle (absent, visiting, visited) with the
//!   claim operation that guarantees at-most-once processing
//! - `ToVisitSet`: every URL ever enqueued, consulted only by the
//!   termination check

mod to_visit;
mod visit_state;

pub use to_visit::ToVisitSet;
pub use visit_state::{VisitStateMap, VisitStatus};

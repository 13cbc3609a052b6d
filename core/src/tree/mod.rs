//! # Execution Tree Evaluator
//!
//! Every control, when first reached, becomes a node in an arena. Each node
//! carries a [`Continuation`] saying where its result or error goes:
//! nowhere (root), to its parent, to an argument slot of its parent, or to
//! its parent request's response slot.
//!
//! ## Core Principles
//!
//! 1. **Arena, not back-references**: nodes are addressed by [`NodeId`]
//! 2. **Work-list driven**: ready nodes sit on an explicit stack; paused
//!    nodes stay on top until a command resolves them
//! 3. **Append-only record**: nodes keep their children and outcomes after
//!    resolution, so the full derivation can be inspected

pub mod arena;
pub mod node;
pub mod script;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use arena::{ExecutionTree, TreeState};
pub use node::{Continuation, Node, NodeId, NodeKind};
pub use snapshot::{NodeDetail, NodeSnapshot, TreeSnapshot};

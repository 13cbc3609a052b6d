//! # Stepper - Continuation-Stack Evaluator
//!
//! ## Core Principles
//!
//! 1. **Stack-driven execution**: pending operations live in a persistent
//!    stack, no recursion
//! 2. **Immutable between steps**: a machine is (control, stack); cloning it
//!    is cheap and yields an independent snapshot
//! 3. **Pure evaluator**: no I/O - just runs until paused, halted or failed

pub mod exec_loop;
pub mod vm;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use exec_loop::{resume, run_script, run_until_paused, step};
pub use vm::{FrameSnapshot, Machine, MachineSnapshot, PendingOp, RunState, Step};

//! Fatal engine errors
//!
//! These signal misuse of an evaluator by its driver (or corrupted internal
//! bookkeeping). They are never produced by a domain computation and never
//! flow through the control channel.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown option label '{label}' (available: {})", .available.join(", "))]
    UnknownLabel { label: String, available: Vec<String> },

    #[error("command mismatch: paused at {expected}, got {found} command")]
    CommandMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("evaluator is not paused")]
    NotPaused,

    #[error("evaluator is not running")]
    NotRunning,

    #[error("argument slot {slot} of node {node} was already filled")]
    SlotAlreadyFilled { node: usize, slot: usize },

    #[error("corrupt continuation at node {node}: {reason}")]
    CorruptContinuation { node: usize, reason: String },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("response of type {found} is not among the accepted types [{}]", .accepts.join(", "))]
    UnacceptableResponse { found: String, accepts: Vec<String> },

    #[error("evaluation finished with {remaining} script command(s) left over")]
    ScriptNotExhausted { remaining: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;

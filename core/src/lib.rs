pub mod cli;
pub mod config;
pub mod library;
pub mod machine;
pub mod stack;
pub mod stepper;
pub mod tree;

// Re-export main types
pub use crate::config::{CliConfig, EngineConfig};
pub use crate::machine::{
    Command, Control, Domain, EngineError, EngineResult, Failure, OperatorDef, Outcome, Schema,
    SystemError,
};
pub use crate::stepper::{Machine, RunState};
pub use crate::tree::{ExecutionTree, TreeState};

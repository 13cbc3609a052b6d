//! Type definitions shared by both evaluators
//!
//! - Value and error schemas (Schema, Domain, SystemError, Failure)
//! - Operators and applications (OperatorDef, Application)
//! - Pause points (OptionsTree, Request)
//! - Control and external commands

pub mod command;
pub mod control;
pub mod operator;
pub mod pause;
pub mod values;

// Re-export all types for convenient access
pub use command::{choices, Command};
pub use control::{Control, ControlKind};
pub use operator::{Application, OperatorDef, Reducer, Reduction};
pub use pause::{Branch, OptionsTree, Request};
pub use values::{Domain, Failure, ObjectTag, Outcome, Schema, SystemError};

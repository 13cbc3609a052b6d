//! # Machine model
//!
//! The object/error/operator/pause-point model shared by both evaluators.
//!
//! ## Core Principles
//!
//! 1. **Domain-agnostic**: values and domain errors come from caller schemas
//! 2. **Two error channels**: domain and system errors flow as controls,
//!    engine misuse is a fatal [`EngineError`]
//! 3. **Lazy pause points**: options branches are only built once chosen

pub mod errors;
pub mod helpers;
pub mod snapshot;
pub mod types;

pub use errors::{EngineError, EngineResult};
pub use helpers::{expect_arity, expect_one_of, expect_payload, expect_tag};
pub use snapshot::ControlSnapshot;
pub use types::*;

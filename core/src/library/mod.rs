//! Demo operator libraries
//!
//! Two small domains used by the `derive` binary and the test suites:
//! - `arith`: natural numbers and fib by cases
//! - `sexp`: S-expression terms built through self-referential menus

pub mod arith;
pub mod sexp;

pub use arith::{fib, fib_script, nat, Arith, ArithError, Nat};
pub use sexp::{Sexp, Term, TermError};

#[cfg(test)]
pub(crate) mod fixtures;

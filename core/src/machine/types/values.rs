//! Value and error schemas
//!
//! The engine never inspects values itself. A caller describes its values and
//! its domain errors as two types implementing [`Schema`], and ties them
//! together with a [`Domain`] marker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A tagged value drawn from a caller-supplied schema
pub trait Schema: Clone + fmt::Debug + 'static {
    /// The closed set of legal tags for this schema
    type Tag: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static;

    fn tag(&self) -> Self::Tag;

    /// Human-readable rendering of the payload, without the tag
    fn render_payload(&self) -> String;

    /// Tag test used to narrow a value before destructuring it
    fn has_tag(&self, tag: Self::Tag) -> bool {
        self.tag() == tag
    }
}

/// Binds the value schema and the domain error schema of one application domain
pub trait Domain: Clone + fmt::Debug + 'static {
    type Object: Schema;
    type Error: Schema;
}

/// Tag type of a domain's values
pub type ObjectTag<D> = <<D as Domain>::Object as Schema>::Tag;

/* ===================== System Errors ===================== */

/// Engine-level failure raised by the argument helpers
///
/// A system error means the operator library was written wrong (an operator
/// received a value it was never meant to see). It travels through the same
/// channel as domain errors but is never confused with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemError {
    pub message: String,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl SystemError {
    pub fn new(message: impl Into<String>) -> Self {
        SystemError {
            message: message.into(),
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn tag_mismatch<T: fmt::Display>(expected: &[T], found: T) -> Self {
        let expected: Vec<String> = expected.iter().map(|t| t.to_string()).collect();
        let found = found.to_string();
        SystemError {
            message: format!("expected one of [{}], found {}", expected.join(", "), found),
            expected,
            found: Some(found),
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system error: {}", self.message)
    }
}

/* ===================== Failures ===================== */

/// Either kind of error that can end a computation
#[derive(Debug, Clone)]
pub enum Failure<D: Domain> {
    Domain(D::Error),
    System(SystemError),
}

impl<D: Domain> Failure<D> {
    pub fn is_system(&self) -> bool {
        matches!(self, Failure::System(_))
    }

    pub fn domain(&self) -> Option<&D::Error> {
        match self {
            Failure::Domain(e) => Some(e),
            Failure::System(_) => None,
        }
    }
}

impl<D: Domain> PartialEq for Failure<D>
where
    D::Error: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Failure::Domain(a), Failure::Domain(b)) => a == b,
            (Failure::System(a), Failure::System(b)) => a == b,
            _ => false,
        }
    }
}

impl<D: Domain> fmt::Display for Failure<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Domain(e) => write!(f, "error {}: {}", e.tag(), e.render_payload()),
            Failure::System(e) => write!(f, "{e}"),
        }
    }
}

/// Final result of a fully reduced computation
pub type Outcome<D> = Result<<D as Domain>::Object, Failure<D>>;

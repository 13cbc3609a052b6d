//! Pause points: options trees and requests

use super::control::Control;
use super::values::{Domain, ObjectTag, Schema};
use crate::machine::errors::EngineError;
use std::fmt;
use std::rc::Rc;

/// One labelled alternative of an options tree
///
/// The thunk only runs once its label is chosen, so a branch may build a
/// fresh copy of the tree it belongs to without diverging.
#[derive(Clone)]
pub struct Branch<D: Domain> {
    pub label: String,
    thunk: Rc<dyn Fn() -> Control<D>>,
}

impl<D: Domain> Branch<D> {
    pub fn new<F>(label: impl Into<String>, thunk: F) -> Self
    where
        F: Fn() -> Control<D> + 'static,
    {
        Branch {
            label: label.into(),
            thunk: Rc::new(thunk),
        }
    }

    pub fn force(&self) -> Control<D> {
        (self.thunk)()
    }
}

impl<D: Domain> fmt::Debug for Branch<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Lazily expanded, human-labelled menu of continuations
///
/// Labels are expected to be distinct. Duplicates are not rejected; lookup
/// picks the first branch carrying the label.
#[derive(Debug, Clone)]
pub struct OptionsTree<D: Domain> {
    pub branches: Vec<Branch<D>>,
}

impl<D: Domain> OptionsTree<D> {
    pub fn new(branches: Vec<Branch<D>>) -> Self {
        OptionsTree { branches }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn find(&self, label: &str) -> Option<&Branch<D>> {
        self.branches.iter().find(|b| b.label == label)
    }

    /// Resolve by label, forcing only the chosen branch
    pub fn choose(&self, label: &str) -> Result<Control<D>, EngineError> {
        let branch = self.find(label).ok_or_else(|| EngineError::UnknownLabel {
            label: label.to_string(),
            available: self.labels().into_iter().map(String::from).collect(),
        })?;
        Ok(branch.force().checked())
    }
}

/// Open-ended ask for a value of one of the declared types
#[derive(Debug, Clone)]
pub struct Request<D: Domain> {
    pub accepts: Vec<ObjectTag<D>>,
}

impl<D: Domain> Request<D> {
    pub fn new(accepts: Vec<ObjectTag<D>>) -> Self {
        Request { accepts }
    }

    pub fn accepts_tag(&self, tag: ObjectTag<D>) -> bool {
        self.accepts.contains(&tag)
    }

    /// Check a response against the declared tags
    ///
    /// Only object responses carry a tag to check; any other control is
    /// passed through unchanged.
    pub fn admit(&self, response: &Control<D>) -> Result<(), EngineError> {
        match response {
            Control::Object(v) if !self.accepts_tag(v.tag()) => {
                Err(EngineError::UnacceptableResponse {
                    found: v.tag().to_string(),
                    accepts: self.accepts.iter().map(|t| t.to_string()).collect(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve with the supplied control
    ///
    /// The response is only checked against `accepts` when `check_tags` is set.
    pub fn respond(&self, response: Control<D>, check_tags: bool) -> Result<Control<D>, EngineError> {
        if check_tags {
            self.admit(&response)?;
        }
        Ok(response.checked())
    }
}

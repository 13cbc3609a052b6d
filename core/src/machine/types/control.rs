//! The control: whatever an evaluator is looking at right now

use super::operator::{Application, OperatorDef};
use super::pause::{Branch, OptionsTree, Request};
use super::values::{Domain, Failure, ObjectTag, Outcome, SystemError};
use std::rc::Rc;

/// Tagged union of everything an evaluator can be focused on
#[derive(Debug, Clone)]
pub enum Control<D: Domain> {
    Object(D::Object),
    Application(Application<D>),
    Options(OptionsTree<D>),
    Request(Request<D>),
    Error(D::Error),
    SystemError(SystemError),
}

/// Coarse classification of a control, used by both evaluators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Object,
    Application,
    Options,
    Request,
    Error,
    SystemError,
}

impl<D: Domain> Control<D> {
    pub fn apply(op: &Rc<OperatorDef<D>>, args: Vec<Control<D>>) -> Self {
        Control::Application(Application::new(Rc::clone(op), args))
    }

    pub fn options(branches: Vec<Branch<D>>) -> Self {
        Control::Options(OptionsTree::new(branches))
    }

    pub fn request(accepts: Vec<ObjectTag<D>>) -> Self {
        Control::Request(Request::new(accepts))
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Object(_) => ControlKind::Object,
            Control::Application(_) => ControlKind::Application,
            Control::Options(_) => ControlKind::Options,
            Control::Request(_) => ControlKind::Request,
            Control::Error(_) => ControlKind::Error,
            Control::SystemError(_) => ControlKind::SystemError,
        }
    }

    /// Options trees and requests wait for an external command
    pub fn is_pause(&self) -> bool {
        matches!(self, Control::Options(_) | Control::Request(_))
    }

    pub fn as_object(&self) -> Option<&D::Object> {
        match self {
            Control::Object(v) => Some(v),
            _ => None,
        }
    }

    /// The failure carried by an error control
    pub fn failure(&self) -> Option<Failure<D>> {
        match self {
            Control::Error(e) => Some(Failure::Domain(e.clone())),
            Control::SystemError(e) => Some(Failure::System(e.clone())),
            _ => None,
        }
    }

    /// Reject pause points the engine cannot honor
    ///
    /// A request that accepts nothing can never be answered; reaching one is
    /// an authoring mistake in the operator library.
    pub fn checked(self) -> Self {
        match self {
            Control::Request(req) if req.accepts.is_empty() => {
                Control::SystemError(SystemError::new("request declares no acceptable types"))
            }
            other => other,
        }
    }

    /// Terminal controls convert to an outcome; everything else is `None`
    pub fn outcome(&self) -> Option<Outcome<D>> {
        match self {
            Control::Object(v) => Some(Ok(v.clone())),
            _ => self.failure().map(Err),
        }
    }
}

impl<D: Domain> From<SystemError> for Control<D> {
    fn from(err: SystemError) -> Self {
        Control::SystemError(err)
    }
}

impl<D: Domain> From<Failure<D>> for Control<D> {
    fn from(failure: Failure<D>) -> Self {
        match failure {
            Failure::Domain(e) => Control::Error(e),
            Failure::System(e) => Control::SystemError(e),
        }
    }
}

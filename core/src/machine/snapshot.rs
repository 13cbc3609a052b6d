//! Plain, displayable snapshots of controls
//!
//! Snapshots are built by reading a control; they never force an options
//! branch, so rendering a paused state has no effect on it.

use super::types::{Control, Domain, Outcome, Schema};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t")]
pub enum ControlSnapshot {
    Object {
        tag: String,
        payload: String,
    },
    Error {
        tag: String,
        payload: String,
    },
    SystemError {
        message: String,
    },
    /// Only the labels; branches are not expanded
    Options {
        labels: Vec<String>,
    },
    Request {
        accepts: Vec<String>,
    },
    Application {
        operator: String,
        params: Vec<String>,
        args: Vec<ControlSnapshot>,
    },
}

impl ControlSnapshot {
    pub fn of<D: Domain>(control: &Control<D>) -> Self {
        match control {
            Control::Object(v) => ControlSnapshot::Object {
                tag: v.tag().to_string(),
                payload: v.render_payload(),
            },
            Control::Error(e) => ControlSnapshot::Error {
                tag: e.tag().to_string(),
                payload: e.render_payload(),
            },
            Control::SystemError(e) => ControlSnapshot::SystemError {
                message: e.message.clone(),
            },
            Control::Options(tree) => ControlSnapshot::Options {
                labels: tree.labels().into_iter().map(String::from).collect(),
            },
            Control::Request(req) => ControlSnapshot::Request {
                accepts: req.accepts.iter().map(|t| t.to_string()).collect(),
            },
            Control::Application(app) => ControlSnapshot::Application {
                operator: app.op.name.clone(),
                params: app.op.params.clone(),
                args: app.args.iter().map(ControlSnapshot::of).collect(),
            },
        }
    }

    pub fn of_outcome<D: Domain>(outcome: &Outcome<D>) -> Self {
        match outcome {
            Ok(v) => ControlSnapshot::of(&Control::<D>::Object(v.clone())),
            Err(f) => ControlSnapshot::of(&Control::<D>::from(f.clone())),
        }
    }
}

impl fmt::Display for ControlSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSnapshot::Object { tag, payload } => write!(f, "({tag} {payload})"),
            ControlSnapshot::Error { tag, payload } => write!(f, "error({tag} {payload})"),
            ControlSnapshot::SystemError { message } => write!(f, "system_error({message})"),
            ControlSnapshot::Options { labels } => write!(f, "options[{}]", labels.join(" | ")),
            ControlSnapshot::Request { accepts } => write!(f, "request<{}>", accepts.join(" | ")),
            ControlSnapshot::Application {
                operator,
                params,
                args,
            } => {
                write!(f, "{operator}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match params.get(i) {
                        Some(name) => write!(f, "{name}: {arg}")?,
                        None => write!(f, "{arg}")?,
                    }
                }
                write!(f, ")")
            }
        }
    }
}

impl<D: Domain> fmt::Display for Control<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ControlSnapshot::of(self), f)
    }
}

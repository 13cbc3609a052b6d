//! External commands that resume a paused evaluator

use super::control::Control;
use super::values::Domain;

/// Input accepted at a pause point
#[derive(Debug, Clone)]
pub enum Command<D: Domain> {
    /// Pick a labelled branch of an options tree
    Choice(String),
    /// Answer a request
    Response(Control<D>),
}

impl<D: Domain> Command<D> {
    pub fn choose(label: impl Into<String>) -> Self {
        Command::Choice(label.into())
    }

    pub fn respond(value: D::Object) -> Self {
        Command::Response(Control::Object(value))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Choice(_) => "choice",
            Command::Response(_) => "response",
        }
    }
}

/// Build a script of choices from labels
pub fn choices<D: Domain, I, S>(labels: I) -> Vec<Command<D>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Command::choose).collect()
}

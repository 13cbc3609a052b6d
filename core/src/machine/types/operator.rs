//! Operator definitions and applications

use super::control::Control;
use super::values::{Domain, SystemError};
use std::fmt;
use std::rc::Rc;

/// What a reducer hands back: the next control, or a system error raised by
/// one of the argument helpers.
pub type Reduction<D> = Result<Control<D>, SystemError>;

/// Reducer function: fully evaluated arguments in declaration order
pub type Reducer<D> = dyn Fn(Vec<<D as Domain>::Object>) -> Reduction<D>;

/// Named, pure reducer
///
/// Operators recurse by returning a fresh [`Application`] of themselves; the
/// engine has no loop construct.
pub struct OperatorDef<D: Domain> {
    pub name: String,
    /// Parameter names, used for display only
    pub params: Vec<String>,
    reducer: Box<Reducer<D>>,
}

impl<D: Domain> OperatorDef<D> {
    pub fn new<I, S, F>(name: impl Into<String>, params: I, reducer: F) -> Rc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Vec<D::Object>) -> Reduction<D> + 'static,
    {
        Rc::new(OperatorDef {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            reducer: Box::new(reducer),
        })
    }

    /// Invoke the reducer, folding a helper failure into the control channel
    pub fn reduce(&self, args: Vec<D::Object>) -> Control<D> {
        match (self.reducer)(args) {
            Ok(control) => control,
            Err(err) => Control::SystemError(err),
        }
    }
}

impl<D: Domain> fmt::Debug for OperatorDef<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Suspended operator call whose arguments have not been reduced yet
#[derive(Debug, Clone)]
pub struct Application<D: Domain> {
    pub op: Rc<OperatorDef<D>>,
    pub args: Vec<Control<D>>,
}

impl<D: Domain> Application<D> {
    pub fn new(op: Rc<OperatorDef<D>>, args: Vec<Control<D>>) -> Self {
        Application { op, args }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

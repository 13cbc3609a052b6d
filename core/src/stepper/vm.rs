//! Continuation-stack machine state
//!
//! The machine holds all evaluation state:
//! - control: the term currently being evaluated
//! - stack: pending operations standing in for the native call stack
//!
//! Both live in persistent structures, so cloning a machine (to keep a
//! snapshot at a pause point) shares every frame with the original.

use crate::config::EngineConfig;
use crate::machine::{Control, ControlSnapshot, Domain, OperatorDef, Outcome};
use crate::stack::Stack;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/* ===================== Pending Operations ===================== */

/// Explicit call frame: an application whose arguments are being reduced
#[derive(Debug, Clone)]
pub struct PendingOp<D: Domain> {
    pub op: Rc<OperatorDef<D>>,

    /// Arguments not started yet, next one on top
    pub remaining: Stack<Control<D>>,

    /// Values of the arguments already reduced, latest on top
    pub results: Stack<D::Object>,
}

impl<D: Domain> PendingOp<D> {
    pub fn new(op: Rc<OperatorDef<D>>, remaining: Stack<Control<D>>) -> Self {
        PendingOp {
            op,
            remaining,
            results: Stack::new(),
        }
    }
}

/* ===================== Machine ===================== */

/// Evaluator state: the current control plus its pending operations
#[derive(Debug, Clone)]
pub struct Machine<D: Domain> {
    pub control: Control<D>,
    pub stack: Stack<PendingOp<D>>,

    pub(crate) config: EngineConfig,
    pub(crate) steps: u64,
}

/// Exactly one of these holds for every machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// A value with nothing left to feed it to
    Halted,
    /// A domain or system error reached the top
    Failed,
    /// Waiting on an options tree or a request
    Paused,
    Running,
}

impl<D: Domain> Machine<D> {
    pub fn new(control: Control<D>) -> Self {
        Machine::with_config(control, EngineConfig::default())
    }

    pub fn with_config(control: Control<D>, config: EngineConfig) -> Self {
        Machine {
            control: control.checked(),
            stack: Stack::new(),
            config,
            steps: 0,
        }
    }

    pub fn state(&self) -> RunState {
        match &self.control {
            Control::Object(_) if self.stack.is_empty() => RunState::Halted,
            Control::Object(_) | Control::Application(_) => RunState::Running,
            Control::Error(_) | Control::SystemError(_) => RunState::Failed,
            Control::Options(_) | Control::Request(_) => RunState::Paused,
        }
    }

    /// Final value or error, once halted or failed
    pub fn outcome(&self) -> Option<Outcome<D>> {
        match self.state() {
            RunState::Halted => self.control.as_object().cloned().map(Ok),
            RunState::Failed => self.control.failure().map(Err),
            RunState::Paused | RunState::Running => None,
        }
    }

    /// The pause point, while paused
    pub fn pause(&self) -> Option<&Control<D>> {
        self.control.is_pause().then_some(&self.control)
    }

    /// Number of steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.state(),
            control: ControlSnapshot::of(&self.control),
            frames: self.stack.iter().map(FrameSnapshot::of).collect(),
        }
    }
}

/* ===================== Frame Management ===================== */

/// Enter an application: reduce a nullary one now, otherwise focus on its
/// first argument and push a frame for the rest.
pub fn enter<D: Domain>(
    op: &Rc<OperatorDef<D>>,
    args: &[Control<D>],
    stack: &Stack<PendingOp<D>>,
) -> (Control<D>, Stack<PendingOp<D>>) {
    match args.split_first() {
        None => (op.reduce(Vec::new()).checked(), stack.clone()),
        Some((first, rest)) => {
            let frame = PendingOp::new(Rc::clone(op), Stack::from_ordered(rest.iter().cloned()));
            (first.clone().checked(), stack.push(frame))
        }
    }
}

/// Feed a reduced argument to the top frame
///
/// Either the next argument becomes the control (and the frame is replaced by
/// one with one fewer argument left), or all arguments are in and the
/// operator's reduction becomes the control (and the frame is dropped).
pub fn feed<D: Domain>(
    value: &D::Object,
    frame: &PendingOp<D>,
    rest: Stack<PendingOp<D>>,
) -> (Control<D>, Stack<PendingOp<D>>) {
    let results = frame.results.push(value.clone());
    match frame.remaining.pop() {
        Some((next, remaining)) => {
            let frame = PendingOp {
                op: Rc::clone(&frame.op),
                remaining,
                results,
            };
            (next.clone().checked(), rest.push(frame))
        }
        None => (frame.op.reduce(results.to_pushed_order()).checked(), rest),
    }
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next step
    Continue,
    /// Stopped at an options tree or request
    Paused,
    /// Halted with a value or failed with an error
    Done,
}

/* ===================== Snapshots ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSnapshot {
    pub operator: String,
    pub done: Vec<ControlSnapshot>,
    pub remaining: Vec<ControlSnapshot>,
}

impl FrameSnapshot {
    fn of<D: Domain>(frame: &PendingOp<D>) -> Self {
        FrameSnapshot {
            operator: frame.op.name.clone(),
            done: frame
                .results
                .to_pushed_order()
                .into_iter()
                .map(|v| ControlSnapshot::of(&Control::<D>::Object(v)))
                .collect(),
            remaining: frame.remaining.iter().map(ControlSnapshot::of).collect(),
        }
    }
}

/// Plain rendering of a machine; frames are listed innermost first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineSnapshot {
    pub state: RunState,
    pub control: ControlSnapshot,
    pub frames: Vec<FrameSnapshot>,
}

impl fmt::Display for MachineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state: {:?}", self.state)?;
        writeln!(f, "control: {}", self.control)?;
        for frame in &self.frames {
            let done: Vec<String> = frame.done.iter().map(|c| c.to_string()).collect();
            let remaining: Vec<String> = frame.remaining.iter().map(|c| c.to_string()).collect();
            writeln!(
                f,
                "  in {}: done [{}], remaining [{}]",
                frame.operator,
                done.join(", "),
                remaining.join(", ")
            )?;
        }
        Ok(())
    }
}

impl<D: Domain> fmt::Display for Machine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

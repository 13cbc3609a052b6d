//! Core execution loop
//!
//! This module contains the step() function - the heart of the stack machine.
//! Each step looks at the current control and the top pending operation and
//! replaces both; nothing recurses on the native stack.
//!
//! ## Function Organization
//! Functions are ordered by importance/call hierarchy:
//! 1. run_script() - Drive a whole derivation from a list of commands
//! 2. resume() - Resolve the current pause point and keep going
//! 3. run_until_paused() - Step until halted, failed or paused
//! 4. step() - One transition

use super::vm::{enter, feed, Machine, RunState, Step};
use crate::machine::{Command, Control, Domain, EngineError, EngineResult};
use tracing::{debug, instrument, trace, warn};

/* ===================== Public API ===================== */

/// Run a script of commands against the machine
///
/// Runs until the first pause, then feeds one command per pause point. Stops
/// when the script is used up (leaving the machine paused for inspection) or
/// evaluation finishes. Commands left over after evaluation finished are an
/// error.
#[instrument(skip_all)]
pub fn run_script<D, I>(machine: &mut Machine<D>, script: I) -> EngineResult<RunState>
where
    D: Domain,
    I: IntoIterator<Item = Command<D>>,
{
    run_until_paused(machine)?;

    let mut commands = script.into_iter();
    while machine.state() == RunState::Paused {
        let Some(command) = commands.next() else {
            break;
        };
        resume(machine, command)?;
    }

    let remaining = commands.count();
    if remaining > 0 {
        warn!(remaining, "script commands left after evaluation finished");
        return Err(EngineError::ScriptNotExhausted { remaining });
    }

    Ok(machine.state())
}

/// Resolve the pause point with `command` and run to the next stop
///
/// A choice is only legal at an options tree and a response only at a
/// request; anything else is a fatal [`EngineError`].
pub fn resume<D: Domain>(machine: &mut Machine<D>, command: Command<D>) -> EngineResult<RunState> {
    debug!(command = command.name(), control = %machine.control, "resume");

    let next = match (&machine.control, command) {
        (Control::Options(tree), Command::Choice(label)) => tree.choose(&label)?,
        (Control::Request(req), Command::Response(response)) => {
            req.respond(response, machine.config.check_response_tags)?
        }
        (Control::Options(_), cmd @ Command::Response(_)) => {
            return Err(mismatch("options", &cmd));
        }
        (Control::Request(_), cmd @ Command::Choice(_)) => {
            return Err(mismatch("request", &cmd));
        }
        _ => {
            warn!(state = ?machine.state(), "command sent to a machine that is not paused");
            return Err(EngineError::NotPaused);
        }
    };

    // The stack is untouched: the pause point simply becomes its resolution.
    machine.control = next;
    run_until_paused(machine)
}

/// Step the machine while it is running
///
/// After return, inspect `machine.state()`: it is never `Running`.
pub fn run_until_paused<D: Domain>(machine: &mut Machine<D>) -> EngineResult<RunState> {
    loop {
        if machine.state() != RunState::Running {
            return Ok(machine.state());
        }
        match step(machine)? {
            Step::Continue => continue,
            Step::Paused | Step::Done => return Ok(machine.state()),
        }
    }
}

/// Execute one step of the machine
///
/// - A value with a pending operation is fed to that operation
/// - An application is entered (or reduced at once if it has no arguments)
///
/// Any other state is not running and stepping it is an error.
pub fn step<D: Domain>(machine: &mut Machine<D>) -> EngineResult<Step> {
    if machine.state() != RunState::Running {
        return Err(EngineError::NotRunning);
    }

    if let Some(limit) = machine.config.step_limit {
        if machine.steps >= limit {
            warn!(limit, "step limit reached");
            return Err(EngineError::StepLimitExceeded { limit });
        }
    }
    machine.steps += 1;

    trace!(
        step = machine.steps,
        depth = machine.stack.len(),
        control = %machine.control,
        "step"
    );

    let (control, stack) = match &machine.control {
        Control::Object(value) => {
            let Some((frame, rest)) = machine.stack.pop() else {
                return Err(EngineError::NotRunning);
            };
            feed(value, frame, rest)
        }
        Control::Application(app) => enter(&app.op, &app.args, &machine.stack),
        _ => return Err(EngineError::NotRunning),
    };

    machine.control = control;
    machine.stack = stack;

    Ok(match machine.state() {
        RunState::Running => Step::Continue,
        RunState::Paused => Step::Paused,
        RunState::Halted | RunState::Failed => Step::Done,
    })
}

/* ===================== Helpers ===================== */

fn mismatch<D: Domain>(expected: &'static str, command: &Command<D>) -> EngineError {
    warn!(expected, found = command.name(), "command does not match pause point");
    EngineError::CommandMismatch {
        expected,
        found: command.name(),
    }
}

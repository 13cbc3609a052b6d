//! Test helpers for stepper tests

use crate::machine::{Command, Control, Domain, EngineError, EngineResult};
use crate::stepper::{resume, run_script, step, Machine, RunState};

/// Build a machine and drive it with `script`
///
/// Panics if the script is rejected; use `run_script` directly to test
/// engine errors.
pub fn run_with<D: Domain>(control: Control<D>, script: Vec<Command<D>>) -> Machine<D> {
    let mut machine = Machine::new(control);
    run_script(&mut machine, script).expect("Script was rejected");
    machine
}

/// Check that exactly one run state holds and that `state()` names it
///
/// Each state is judged by its own observable: a value with no frames left,
/// a failure in control, a pause point in control, or a clone that accepts a
/// step. Returns the state found. The trial step runs a reducer on the
/// clone, so operators that record side effects will record it too.
pub fn assert_state_consistent<D: Domain>(machine: &Machine<D>) -> RunState {
    let halted = machine.control.as_object().is_some() && machine.stack.is_empty();
    let failed = machine.control.failure().is_some();
    let paused = machine.pause().is_some();
    let running = !matches!(step(&mut machine.clone()), Err(EngineError::NotRunning));

    let holding: Vec<RunState> = [
        (RunState::Halted, halted),
        (RunState::Failed, failed),
        (RunState::Paused, paused),
        (RunState::Running, running),
    ]
    .into_iter()
    .filter_map(|(state, holds)| holds.then_some(state))
    .collect();

    assert_eq!(holding, vec![machine.state()], "{machine}");
    assert_eq!(machine.outcome().is_some(), halted || failed, "{machine}");
    machine.state()
}

/// Step through `script`, checking the state before every step and after
/// every resume; returns the states seen, in order
pub fn drive_checked<D: Domain>(
    machine: &mut Machine<D>,
    script: Vec<Command<D>>,
) -> Vec<RunState> {
    let mut script = script.into_iter();
    let mut seen = Vec::new();
    loop {
        let state = assert_state_consistent(machine);
        seen.push(state);
        match state {
            RunState::Running => {
                step(machine).expect("Running machine refused a step");
            }
            RunState::Paused => {
                let Some(command) = script.next() else {
                    return seen;
                };
                resume(machine, command).expect("Command was rejected");
            }
            RunState::Halted | RunState::Failed => return seen,
        }
    }
}

pub fn resume_all<D: Domain>(
    machine: &mut Machine<D>,
    commands: Vec<Command<D>>,
) -> EngineResult<RunState> {
    let mut state = machine.state();
    for command in commands {
        state = resume(machine, command)?;
    }
    Ok(state)
}

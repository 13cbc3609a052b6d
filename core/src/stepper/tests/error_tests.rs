//! Tests for engine errors and error propagation
//!
//! Engine errors come back as `Err`; domain and system errors end the run as
//! a failed state.

use super::helpers::run_with;
use crate::config::EngineConfig;
use crate::library::arith::{self, Arith, ArithError};
use crate::library::fixtures::{fib_of, sum_to};
use crate::library::sexp::{self, Term};
use crate::machine::{choices, Command, Control, EngineError, Failure};
use crate::stepper::{resume, run_script, run_until_paused, step, Machine, RunState};

#[test]
fn test_choice_at_request_is_mismatch() {
    let mut machine = Machine::new(sexp::string_request());
    run_until_paused(&mut machine).unwrap();

    assert_eq!(
        resume(&mut machine, Command::choose("atom")),
        Err(EngineError::CommandMismatch {
            expected: "request",
            found: "choice",
        })
    );
    assert_eq!(machine.state(), RunState::Paused);
}

#[test]
fn test_response_at_options_is_mismatch() {
    let mut machine = Machine::new(sexp::term());
    run_until_paused(&mut machine).unwrap();

    assert_eq!(
        resume(&mut machine, Command::respond(Term::Str("a".into()))),
        Err(EngineError::CommandMismatch {
            expected: "options",
            found: "response",
        })
    );
    assert_eq!(machine.state(), RunState::Paused);
}

#[test]
fn test_unknown_label() {
    let mut machine = Machine::new(fib_of(2));
    run_until_paused(&mut machine).unwrap();

    let Err(EngineError::UnknownLabel { label, available }) =
        resume(&mut machine, Command::choose("two"))
    else {
        unreachable!("Expected unknown label error");
    };
    assert_eq!(label, "two");
    assert_eq!(available, vec!["zero", "one", "ge_two"]);

    // Misuse does not disturb the machine
    assert_eq!(machine.state(), RunState::Paused);
    assert_eq!(
        resume(&mut machine, Command::choose("ge_two")),
        Ok(RunState::Paused)
    );
}

#[test]
fn test_resume_when_not_paused() {
    let mut machine = Machine::new(arith::nat(1));
    assert_eq!(
        resume(&mut machine, Command::choose("zero")),
        Err(EngineError::NotPaused)
    );
}

#[test]
fn test_step_when_not_running() {
    let mut halted = Machine::new(arith::nat(1));
    assert_eq!(step(&mut halted), Err(EngineError::NotRunning));

    let mut paused = Machine::new(fib_of(0));
    run_until_paused(&mut paused).unwrap();
    assert_eq!(step(&mut paused), Err(EngineError::NotRunning));
}

#[test]
fn test_step_limit() {
    let config = EngineConfig::default().with_step_limit(10);
    let mut machine = Machine::with_config(Control::apply(&sum_to(), vec![arith::nat(50)]), config);

    assert_eq!(
        run_until_paused(&mut machine),
        Err(EngineError::StepLimitExceeded { limit: 10 })
    );
    assert_eq!(machine.steps(), 10);
    assert_eq!(machine.state(), RunState::Running);
}

#[test]
fn test_step_limit_counts_across_resumes() {
    let config = EngineConfig::default().with_step_limit(4);
    let mut machine = Machine::with_config(fib_of(2), config);

    // fib(2): enter, feed, then ge_two needs more steps than are left
    let result = run_script(&mut machine, choices(["ge_two", "zero", "one"]));
    assert_eq!(result, Err(EngineError::StepLimitExceeded { limit: 4 }));
}

#[test]
fn test_empty_request_is_system_error() {
    let machine = run_with::<Arith>(Control::request(Vec::new()), Vec::new());
    let Some(Err(Failure::System(err))) = machine.outcome() else {
        unreachable!("Expected system error, got {:?}", machine.outcome());
    };
    assert_eq!(err.message, "request declares no acceptable types");

    let nested = Control::apply(
        &arith::plus(),
        vec![arith::nat(1), Control::request(Vec::new())],
    );
    let machine = run_with::<Arith>(nested, Vec::new());
    assert_eq!(machine.state(), RunState::Failed);
}

#[test]
fn test_system_error_is_not_domain_error() {
    // plus applied to a single argument trips its arity check
    let machine = run_with(
        Control::apply(&arith::plus(), vec![arith::nat(1)]),
        Vec::new(),
    );

    let Some(Err(failure)) = machine.outcome() else {
        unreachable!("Expected failure, got {:?}", machine.outcome());
    };
    assert!(failure.is_system());
    assert_eq!(failure.domain(), None);
    let Control::SystemError(err) = &machine.control else {
        unreachable!("Expected system error control");
    };
    assert_eq!(err.message, "expected 2 argument(s), got 1");
}

#[test]
fn test_wrong_case_is_domain_error() {
    let machine = run_with(fib_of(2), choices(["one"]));

    assert_eq!(
        machine.outcome(),
        Some(Err(Failure::Domain(ArithError::WrongCase {
            case: "one".to_string(),
            n: 2,
        })))
    );
}

#[test]
fn test_overflow_surfaces_as_domain_error() {
    let big = Control::apply(&arith::plus(), vec![arith::nat(u64::MAX), arith::nat(1)]);
    let machine = run_with(big, Vec::new());

    let Some(Err(Failure::Domain(ArithError::Overflow))) = machine.outcome() else {
        unreachable!("Expected overflow, got {:?}", machine.outcome());
    };
}

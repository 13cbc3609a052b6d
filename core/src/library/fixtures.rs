//! Operators used only by the evaluator test suites

use super::arith::{self, Arith, Nat};
use crate::machine::{choices, expect_arity, Branch, Command, Control, OperatorDef};
use std::cell::RefCell;
use std::rc::Rc;

/// Names recorded by [`tick`] in reduction order
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn logged(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Nullary application that records `name` when reduced and yields `value`
pub fn tick(log: &Log, name: &str, value: u64) -> Control<Arith> {
    let log = Rc::clone(log);
    let label = name.to_string();
    let op = OperatorDef::new(name, Vec::<String>::new(), move |_args: Vec<Nat>| {
        log.borrow_mut().push(label.clone());
        Ok(arith::nat(value))
    });
    Control::apply(&op, Vec::new())
}

/// Options tree whose every branch records the label it was forced with
pub fn logged_menu(log: &Log, labels: &[&str]) -> Control<Arith> {
    let branches = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let log = Rc::clone(log);
            let name = label.to_string();
            Branch::new(*label, move || {
                log.borrow_mut().push(format!("forced {name}"));
                arith::nat(i as u64)
            })
        })
        .collect();
    Control::options(branches)
}

/// sum_to(n) = plus(n, sum_to(n - 1)); keeps one `plus` pending per level
pub fn sum_to() -> Rc<OperatorDef<Arith>> {
    OperatorDef::new("sum_to", ["n"], |args| {
        expect_arity(&args, 1)?;
        let Nat(n) = args[0];
        Ok(if n == 0 {
            arith::nat(0)
        } else {
            Control::apply(
                &arith::plus(),
                vec![arith::nat(n), Control::apply(&sum_to(), vec![arith::nat(n - 1)])],
            )
        })
    })
}

pub fn fib_of(n: u64) -> Control<Arith> {
    Control::apply(&arith::fib(), vec![arith::nat(n)])
}

/// The choices that derive fib(n) correctly
pub fn fib_commands(n: u64) -> Vec<Command<Arith>> {
    choices(arith::fib_script(n))
}

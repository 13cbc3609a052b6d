//! Natural-number arithmetic
//!
//! `fib` is the canonical interactive derivation: for each call the user
//! picks which defining case applies, and a wrong pick is a domain error.

use crate::machine::{
    expect_arity, expect_tag, Branch, Control, Domain, OperatorDef, Schema, SystemError,
};
use std::fmt;
use std::rc::Rc;

/// Marker for the arithmetic domain
#[derive(Debug, Clone)]
pub struct Arith;

impl Domain for Arith {
    type Object = Nat;
    type Error = ArithError;
}

/* ===================== Values ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NatTag {
    NaturalNumber,
}

impl fmt::Display for NatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatTag::NaturalNumber => write!(f, "Natural_Number"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nat(pub u64);

impl Schema for Nat {
    type Tag = NatTag;

    fn tag(&self) -> NatTag {
        NatTag::NaturalNumber
    }

    fn render_payload(&self) -> String {
        self.0.to_string()
    }
}

/* ===================== Errors ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithErrorTag {
    WrongCase,
    Underflow,
    Overflow,
}

impl fmt::Display for ArithErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithErrorTag::WrongCase => "Wrong_Case",
            ArithErrorTag::Underflow => "Underflow",
            ArithErrorTag::Overflow => "Overflow",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    /// The chosen defining case does not match the argument
    WrongCase { case: String, n: u64 },
    Underflow,
    Overflow,
}

impl Schema for ArithError {
    type Tag = ArithErrorTag;

    fn tag(&self) -> ArithErrorTag {
        match self {
            ArithError::WrongCase { .. } => ArithErrorTag::WrongCase,
            ArithError::Underflow => ArithErrorTag::Underflow,
            ArithError::Overflow => ArithErrorTag::Overflow,
        }
    }

    fn render_payload(&self) -> String {
        match self {
            ArithError::WrongCase { case, n } => format!("case {case} does not apply to {n}"),
            ArithError::Underflow => "result below zero".to_string(),
            ArithError::Overflow => "result too large".to_string(),
        }
    }
}

/* ===================== Helpers ===================== */

pub fn nat(n: u64) -> Control<Arith> {
    Control::Object(Nat(n))
}

/// Ask the user for a natural number
pub fn nat_request() -> Control<Arith> {
    Control::request(vec![NatTag::NaturalNumber])
}

fn number(value: &Nat) -> Result<u64, SystemError> {
    expect_tag(value, NatTag::NaturalNumber).map(|n| n.0)
}

fn wrong_case(case: &str, n: u64) -> Control<Arith> {
    Control::Error(ArithError::WrongCase {
        case: case.to_string(),
        n,
    })
}

/* ===================== Operators ===================== */

pub fn plus() -> Rc<OperatorDef<Arith>> {
    OperatorDef::new("plus", ["a", "b"], |args| {
        expect_arity(&args, 2)?;
        let (a, b) = (number(&args[0])?, number(&args[1])?);
        Ok(match a.checked_add(b) {
            Some(sum) => nat(sum),
            None => Control::Error(ArithError::Overflow),
        })
    })
}

pub fn minus_one() -> Rc<OperatorDef<Arith>> {
    OperatorDef::new("minus_one", ["n"], |args| {
        expect_arity(&args, 1)?;
        let n = number(&args[0])?;
        Ok(match n.checked_sub(1) {
            Some(m) => nat(m),
            None => Control::Error(ArithError::Underflow),
        })
    })
}

/// Fibonacci by cases, one options tree per call
///
/// - `zero`: fib(0) = 0
/// - `one`: fib(1) = 1
/// - `ge_two`: fib(n) = plus(fib(n - 2), fib(n - 1))
pub fn fib() -> Rc<OperatorDef<Arith>> {
    OperatorDef::new("fib", ["n"], |args| {
        expect_arity(&args, 1)?;
        let n = number(&args[0])?;
        Ok(fib_cases(n))
    })
}

fn fib_cases(n: u64) -> Control<Arith> {
    Control::options(vec![
        Branch::new("zero", move || if n == 0 { nat(0) } else { wrong_case("zero", n) }),
        Branch::new("one", move || if n == 1 { nat(1) } else { wrong_case("one", n) }),
        Branch::new("ge_two", move || {
            if n < 2 {
                return wrong_case("ge_two", n);
            }
            let f = fib();
            Control::apply(
                &plus(),
                vec![
                    Control::apply(&f, vec![nat(n - 2)]),
                    Control::apply(&f, vec![nat(n - 1)]),
                ],
            )
        }),
    ])
}

/// The case label that applies to `fib(n)`
pub fn fib_case(n: u64) -> &'static str {
    match n {
        0 => "zero",
        1 => "one",
        _ => "ge_two",
    }
}

/// Labels a user would choose, in evaluation order, to derive `fib(n)`
pub fn fib_script(n: u64) -> Vec<&'static str> {
    // Mirrors left-to-right evaluation: fib(n-2) is fully derived before fib(n-1).
    let mut labels = Vec::new();
    let mut todo = vec![n];
    while let Some(k) = todo.pop() {
        labels.push(fib_case(k));
        if k >= 2 {
            todo.push(k - 1);
            todo.push(k - 2);
        }
    }
    labels
}

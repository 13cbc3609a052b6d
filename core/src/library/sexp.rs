//! S-expression terms built one decision at a time
//!
//! `term()` offers `atom | variable | list`; `list` offers
//! `empty | non_empty`, and `non_empty` asks for a head term and a tail list
//! by offering the same menus again. The menus refer to themselves, which is
//! only finite because branches are built when chosen.

use crate::machine::{
    expect_arity, expect_one_of, expect_payload, Branch, Control, Domain, OperatorDef, Schema,
};
use std::fmt;
use std::rc::Rc;

/// Marker for the S-expression domain
#[derive(Debug, Clone)]
pub struct Sexp;

impl Domain for Sexp {
    type Object = Term;
    type Error = TermError;
}

/* ===================== Values ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermTag {
    String,
    Atom,
    Variable,
    List,
}

impl fmt::Display for TermTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Raw text supplied by the user
    Str(String),
    Atom(String),
    Variable(String),
    List(Vec<Term>),
}

impl Term {
    /// Raw text, for `Str` only
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Term::Str(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl Schema for Term {
    type Tag = TermTag;

    fn tag(&self) -> TermTag {
        match self {
            Term::Str(_) => TermTag::String,
            Term::Atom(_) => TermTag::Atom,
            Term::Variable(_) => TermTag::Variable,
            Term::List(_) => TermTag::List,
        }
    }

    fn render_payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Str(s) => write!(f, "{s:?}"),
            Term::Atom(a) => write!(f, "{a}"),
            Term::Variable(v) => write!(f, "?{v}"),
            Term::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/* ===================== Errors ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermErrorTag {
    EmptyName,
    EmptyList,
}

impl fmt::Display for TermErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    /// Atoms and variables need a non-empty name
    EmptyName,
    EmptyList,
}

impl Schema for TermError {
    type Tag = TermErrorTag;

    fn tag(&self) -> TermErrorTag {
        match self {
            TermError::EmptyName => TermErrorTag::EmptyName,
            TermError::EmptyList => TermErrorTag::EmptyList,
        }
    }

    fn render_payload(&self) -> String {
        match self {
            TermError::EmptyName => "name must not be empty".to_string(),
            TermError::EmptyList => "list has no elements".to_string(),
        }
    }
}

/* ===================== Operators ===================== */

const TERM_TAGS: [TermTag; 3] = [TermTag::Atom, TermTag::Variable, TermTag::List];

fn named(name: &'static str, make: fn(String) -> Term) -> Rc<OperatorDef<Sexp>> {
    OperatorDef::new(name, ["name"], move |args| {
        expect_arity(&args, 1)?;
        let text = expect_payload(&args[0], TermTag::String, Term::as_text)?;
        Ok(if text.is_empty() {
            Control::Error(TermError::EmptyName)
        } else {
            Control::Object(make(text.to_string()))
        })
    })
}

pub fn make_atom() -> Rc<OperatorDef<Sexp>> {
    named("atom", Term::Atom)
}

pub fn make_variable() -> Rc<OperatorDef<Sexp>> {
    named("variable", Term::Variable)
}

/// cons(head, tail): prepend a term to a list
pub fn cons() -> Rc<OperatorDef<Sexp>> {
    OperatorDef::new("cons", ["head", "tail"], |args| {
        expect_arity(&args, 2)?;
        expect_one_of(&args[0], &TERM_TAGS)?;
        let tail = expect_payload(&args[1], TermTag::List, Term::as_list)?;
        let mut items = Vec::with_capacity(tail.len() + 1);
        items.push(args[0].clone());
        items.extend(tail.iter().cloned());
        Ok(Control::Object(Term::List(items)))
    })
}

/// head(list): first element, or a domain error for the empty list
pub fn head() -> Rc<OperatorDef<Sexp>> {
    OperatorDef::new("head", ["list"], |args| {
        expect_arity(&args, 1)?;
        let items = expect_payload(&args[0], TermTag::List, Term::as_list)?;
        Ok(match items.first() {
            Some(first) => Control::Object(first.clone()),
            None => Control::Error(TermError::EmptyList),
        })
    })
}

/* ===================== Menus ===================== */

pub fn string_request() -> Control<Sexp> {
    Control::request(vec![TermTag::String])
}

/// Menu for any term
pub fn term() -> Control<Sexp> {
    Control::options(vec![
        Branch::new("atom", || Control::apply(&make_atom(), vec![string_request()])),
        Branch::new("variable", || {
            Control::apply(&make_variable(), vec![string_request()])
        }),
        Branch::new("list", list),
    ])
}

/// Menu for a list
pub fn list() -> Control<Sexp> {
    Control::options(vec![
        Branch::new("empty", || Control::Object(Term::List(Vec::new()))),
        Branch::new("non_empty", || Control::apply(&cons(), vec![term(), list()])),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        let t = Term::List(vec![
            Term::Atom("f".into()),
            Term::Variable("x".into()),
            Term::List(vec![]),
        ]);
        assert_eq!(t.to_string(), "(f ?x ())");
    }

    #[test]
    fn test_cons_rejects_non_list_tail() {
        let control = cons().reduce(vec![Term::Atom("a".into()), Term::Atom("b".into())]);
        let Control::SystemError(err) = control else {
            unreachable!("Expected system error, got {:?}", control);
        };
        assert_eq!(err.expected, vec!["List".to_string()]);
        assert_eq!(err.found.as_deref(), Some("Atom"));
    }

    #[test]
    fn test_cons_rejects_raw_string_head() {
        let control = cons().reduce(vec![Term::Str("a".into()), Term::List(vec![])]);
        let Control::SystemError(err) = control else {
            unreachable!("Expected system error, got {:?}", control);
        };
        assert_eq!(err.found.as_deref(), Some("String"));
    }

    #[test]
    fn test_head_and_names_narrow_their_argument() {
        let control = head().reduce(vec![Term::List(vec![Term::Atom("a".into())])]);
        assert!(matches!(control, Control::Object(Term::Atom(ref a)) if a == "a"));

        let control = make_variable().reduce(vec![Term::Str("x".into())]);
        assert!(matches!(control, Control::Object(Term::Variable(ref v)) if v == "x"));

        let control = make_atom().reduce(vec![Term::Atom("a".into())]);
        let Control::SystemError(err) = control else {
            unreachable!("Expected system error, got {:?}", control);
        };
        assert_eq!(err.expected, vec!["String".to_string()]);
        assert_eq!(err.found.as_deref(), Some("Atom"));
    }

    #[test]
    fn test_atom_with_empty_name_is_domain_error() {
        let control = make_atom().reduce(vec![Term::Str(String::new())]);
        let Control::Error(TermError::EmptyName) = control else {
            unreachable!("Expected EmptyName, got {:?}", control);
        };
    }

    #[test]
    fn test_head_of_empty_list() {
        let control = head().reduce(vec![Term::List(vec![])]);
        let Control::Error(TermError::EmptyList) = control else {
            unreachable!("Expected EmptyList, got {:?}", control);
        };
    }
}

//! Tests for pause points and command application in the execution tree

use super::helpers::{outcome, run_tree};
use crate::config::EngineConfig;
use crate::library::arith::{self, Arith, Nat};
use crate::library::fixtures::{fib_commands, fib_of, log, logged, logged_menu};
use crate::library::sexp::{self, Sexp, Term};
use crate::machine::{choices, Branch, Command, Control, EngineError, Failure};
use crate::tree::{Continuation, ExecutionTree, NodeId, NodeKind, TreeState};

#[test]
fn test_pauses_at_options() {
    let mut tree = ExecutionTree::new(fib_of(1));
    assert_eq!(tree.run(), Ok(TreeState::Paused(NodeId(2))));
    assert_eq!(tree.paused(), Some(NodeId(2)));
    assert_eq!(tree.outcome(), None);

    // A paused node is left in place
    assert_eq!(tree.advance(), Ok(TreeState::Paused(NodeId(2))));
    assert_eq!(tree.steps(), 2);

    let NodeKind::Options { tree: menu, chosen } = &tree[NodeId(2)].kind else {
        unreachable!("Expected options node");
    };
    assert_eq!(menu.labels(), vec!["zero", "one", "ge_two"]);
    assert_eq!(*chosen, None);
}

#[test]
fn test_apply_records_choice() {
    let mut tree = ExecutionTree::new(fib_of(1));
    tree.run().unwrap();

    tree.apply(Command::choose("one")).unwrap();
    assert_eq!(tree.state(), TreeState::Running);
    assert_eq!(tree.pending(), &[NodeId(3)]);

    let NodeKind::Options { chosen, .. } = &tree[NodeId(2)].kind else {
        unreachable!("Expected options node");
    };
    assert_eq!(chosen, &Some(("one".to_string(), NodeId(3))));
    assert_eq!(tree[NodeId(3)].cont, Continuation::Parent(NodeId(2)));

    assert_eq!(tree.run(), Ok(TreeState::Finished));
    assert_eq!(outcome(&tree), Some(Ok(Nat(1))));
}

#[test]
fn test_only_chosen_branch_is_forced() {
    let log = log();
    let tree = run_tree(logged_menu(&log, &["a", "b", "c"]), choices(["c"]));

    assert_eq!(logged(&log), vec!["forced c"]);
    assert_eq!(outcome(&tree), Some(Ok(Nat(2))));
}

#[test]
fn test_pauses_are_reported_left_to_right() {
    let log = log();
    let args = vec![logged_menu(&log, &["l"]), logged_menu(&log, &["r"])];
    let mut tree = ExecutionTree::new(Control::apply(&arith::plus(), args));

    // Both menus exist as argument nodes, but only the left one is waiting
    assert_eq!(tree.run(), Ok(TreeState::Paused(NodeId(1))));
    tree.apply(Command::choose("l")).unwrap();
    assert_eq!(tree.run(), Ok(TreeState::Paused(NodeId(2))));
    tree.apply(Command::choose("r")).unwrap();
    assert_eq!(tree.run(), Ok(TreeState::Finished));

    assert_eq!(logged(&log), vec!["forced l", "forced r"]);
}

#[test]
fn test_request_records_response() {
    let atom = Control::apply(&sexp::make_atom(), vec![sexp::string_request()]);
    let mut tree = ExecutionTree::new(atom);
    let TreeState::Paused(at) = tree.run().unwrap() else {
        unreachable!("Expected request pause");
    };

    tree.apply(Command::respond(Term::Str("x".into()))).unwrap();
    let NodeKind::Request { request, response } = &tree[at].kind else {
        unreachable!("Expected request node");
    };
    assert_eq!(request.accepts, vec![sexp::TermTag::String]);
    let Some(child) = *response else {
        unreachable!("Response should be recorded");
    };
    assert_eq!(tree[child].cont, Continuation::Response(at));

    assert_eq!(tree.run(), Ok(TreeState::Finished));
    assert_eq!(outcome(&tree), Some(Ok(Term::Atom("x".into()))));
    assert_eq!(tree[at].outcome, Some(Ok(Term::Str("x".into()))));
}

#[test]
fn test_sexp_single_element_list() {
    let script = vec![
        Command::choose("list"),
        Command::choose("non_empty"),
        Command::choose("atom"),
        Command::respond(Term::Str("a".into())),
        Command::choose("empty"),
    ];
    let tree = run_tree(sexp::term(), script);

    assert_eq!(
        outcome(&tree),
        Some(Ok(Term::List(vec![Term::Atom("a".into())])))
    );
}

#[test]
fn test_self_referential_menu_expands_on_demand() {
    let tree = run_tree(
        sexp::list(),
        choices(["non_empty", "list", "empty", "empty"]),
    );

    assert_eq!(
        outcome(&tree),
        Some(Ok(Term::List(vec![Term::List(Vec::new())])))
    );
}

#[test]
fn test_script_stops_at_pause_when_exhausted() {
    let mut tree = ExecutionTree::new(fib_of(3));
    let state = tree.run_script(choices(["ge_two"]));

    let Ok(TreeState::Paused(at)) = state else {
        unreachable!("Expected pause, got {:?}", state);
    };
    assert_eq!(tree.paused(), Some(at));
}

#[test]
fn test_leftover_script_is_error() {
    let mut tree = ExecutionTree::new(fib_of(0));
    let mut script = fib_commands(0);
    script.extend(choices(["one", "zero"]));

    assert_eq!(
        tree.run_script(script),
        Err(EngineError::ScriptNotExhausted { remaining: 2 })
    );
    assert_eq!(outcome(&tree), Some(Ok(Nat(0))));
}

#[test]
fn test_duplicate_labels_first_branch_wins() {
    let menu = Control::options(vec![
        Branch::new("same", || arith::nat(1)),
        Branch::new("same", || arith::nat(2)),
    ]);
    let tree = run_tree::<Arith>(menu, choices(["same"]));

    assert_eq!(outcome(&tree), Some(Ok(Nat(1))));
}

#[test]
fn test_response_tags_unchecked_by_default() {
    let atom = Control::apply(&sexp::make_atom(), vec![sexp::string_request()]);
    let tree = run_tree(atom, vec![Command::respond(Term::Atom("oops".into()))]);

    let Some(Err(Failure::System(err))) = outcome(&tree) else {
        unreachable!("Expected system error, got {:?}", tree.outcome());
    };
    assert_eq!(err.expected, vec!["String".to_string()]);
}

#[test]
fn test_response_tags_checked_when_enabled() {
    let atom = Control::apply(&sexp::make_atom(), vec![sexp::string_request()]);
    let config = EngineConfig::default().with_response_checks();
    let mut tree = ExecutionTree::<Sexp>::with_config(atom, config);
    let TreeState::Paused(at) = tree.run().unwrap() else {
        unreachable!("Expected request pause");
    };
    let len = tree.len();

    let result = tree.apply(Command::respond(Term::Variable("oops".into())));
    assert_eq!(
        result,
        Err(EngineError::UnacceptableResponse {
            found: "Variable".to_string(),
            accepts: vec!["String".to_string()],
        })
    );

    // Nothing was attached
    assert_eq!(tree.len(), len);
    assert_eq!(tree.paused(), Some(at));

    tree.apply(Command::respond(Term::Str("ok".into()))).unwrap();
    assert_eq!(tree.run(), Ok(TreeState::Finished));
}

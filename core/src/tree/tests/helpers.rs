//! Test helpers for execution tree tests

use crate::machine::{Command, Control, Domain, Outcome};
use crate::tree::{ExecutionTree, NodeDetail, TreeSnapshot};

/// Build a tree and drive it with `script`
///
/// Panics if the script is rejected; use `run_script` directly to test
/// engine errors.
pub fn run_tree<D: Domain>(control: Control<D>, script: Vec<Command<D>>) -> ExecutionTree<D> {
    let mut tree = ExecutionTree::new(control);
    tree.run_script(script).expect("Script was rejected");
    tree
}

pub fn outcome<D: Domain>(tree: &ExecutionTree<D>) -> Option<Outcome<D>> {
    tree.outcome().cloned()
}

/// Chosen labels recorded in a snapshot, in the order they were chosen
///
/// Options nodes are allocated when control first reaches them, so node ids
/// follow the order of the pauses.
pub fn recorded_choices(snapshot: &TreeSnapshot) -> Vec<String> {
    snapshot
        .nodes
        .iter()
        .filter_map(|node| match &node.detail {
            NodeDetail::Options { chosen, .. } => chosen.clone(),
            _ => None,
        })
        .collect()
}

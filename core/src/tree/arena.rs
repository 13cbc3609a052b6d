//! Execution tree: node arena plus work-list
//!
//! Nodes are never removed. Once resolved, a node keeps its children and the
//! outcome that passed through it, so the arena is a full record of the
//! derivation.

use super::node::{Continuation, Node, NodeId, NodeKind};
use crate::config::EngineConfig;
use crate::machine::{Command, Control, Domain, EngineError, EngineResult, Outcome};
use std::ops::Index;
use tracing::{debug, trace, warn};

/// Where the tree stands between calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// Unpaused work is waiting on the work-list
    Running,
    /// The node on top of the work-list needs a command
    Paused(NodeId),
    /// The work-list is empty; the root's outcome is known
    Finished,
}

/// Mutable derivation tree driven by one controller at a time
#[derive(Debug, Clone)]
pub struct ExecutionTree<D: Domain> {
    nodes: Vec<Node<D>>,
    root: NodeId,

    /// Ready-to-advance nodes, next on top
    work: Vec<NodeId>,

    outcome: Option<Outcome<D>>,
    config: EngineConfig,
    steps: u64,
}

impl<D: Domain> ExecutionTree<D> {
    pub fn new(control: Control<D>) -> Self {
        ExecutionTree::with_config(control, EngineConfig::default())
    }

    pub fn with_config(control: Control<D>, config: EngineConfig) -> Self {
        let mut tree = ExecutionTree {
            nodes: Vec::new(),
            root: NodeId(0),
            work: Vec::new(),
            outcome: None,
            config,
            steps: 0,
        };
        tree.root = tree.alloc(control, Continuation::Root);
        tree.work.push(tree.root);
        tree
    }

    /* ===================== Inspection ===================== */

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Outcome of the root, once the derivation has finished
    pub fn outcome(&self) -> Option<&Outcome<D>> {
        self.outcome.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn state(&self) -> TreeState {
        match self.work.last() {
            None => TreeState::Finished,
            Some(&id) if self.nodes[id.0].is_paused() => TreeState::Paused(id),
            Some(_) => TreeState::Running,
        }
    }

    /// The node waiting for a command, if any
    pub fn paused(&self) -> Option<NodeId> {
        match self.state() {
            TreeState::Paused(id) => Some(id),
            TreeState::Running | TreeState::Finished => None,
        }
    }

    /// Ids on the work-list, bottom first
    pub fn pending(&self) -> &[NodeId] {
        &self.work
    }

    /* ===================== Driving ===================== */

    /// Advance until paused or finished
    pub fn run(&mut self) -> EngineResult<TreeState> {
        loop {
            match self.advance()? {
                TreeState::Running => continue,
                state => return Ok(state),
            }
        }
    }

    /// Pop one unpaused node and perform its action
    ///
    /// - Object and error nodes report themselves to their continuation
    /// - Application nodes build their argument trees and schedule the first
    ///   (or reduce at once when they take no arguments)
    ///
    /// A paused node on top is left in place.
    pub fn advance(&mut self) -> EngineResult<TreeState> {
        let Some(&id) = self.work.last() else {
            return Ok(TreeState::Finished);
        };
        if self.nodes[id.0].is_paused() {
            return Ok(TreeState::Paused(id));
        }

        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                warn!(limit, "step limit reached");
                return Err(EngineError::StepLimitExceeded { limit });
            }
        }
        self.steps += 1;
        self.work.pop();

        trace!(
            step = self.steps,
            node = id.0,
            kind = self.nodes[id.0].kind_name(),
            pending = self.work.len(),
            "advance"
        );

        let outcome: Option<Outcome<D>> = match &self.nodes[id.0].kind {
            NodeKind::Object(v) => Some(Ok(v.clone())),
            NodeKind::Error(f) => Some(Err(f.clone())),
            NodeKind::Application { .. } => None,
            NodeKind::Options { .. } | NodeKind::Request { .. } => {
                return Err(corrupt(id, "resolved pause point scheduled again"));
            }
        };

        match outcome {
            Some(outcome) => self.deliver(id, outcome)?,
            None => self.enter(id)?,
        }

        Ok(self.state())
    }

    /// Resolve the paused node on top of the work-list
    ///
    /// The resolution becomes a single child (continuation: the paused node)
    /// and replaces the paused node as pending work.
    pub fn apply(&mut self, command: Command<D>) -> EngineResult<()> {
        let Some(id) = self.paused() else {
            warn!(command = command.name(), "command sent to a tree that is not paused");
            return Err(EngineError::NotPaused);
        };

        debug!(node = id.0, command = command.name(), "apply command");

        let (control, label) = match command {
            Command::Choice(label) => {
                let NodeKind::Options { tree, .. } = &self.nodes[id.0].kind else {
                    return Err(mismatch("request", "choice"));
                };
                (tree.choose(&label)?, Some(label))
            }
            Command::Response(response) => {
                let NodeKind::Request { request, .. } = &self.nodes[id.0].kind else {
                    return Err(mismatch("options", "response"));
                };
                (request.respond(response, self.config.check_response_tags)?, None)
            }
        };

        self.work.pop();
        let child = match label {
            Some(label) => {
                let child = self.alloc(control, Continuation::Parent(id));
                if let NodeKind::Options { chosen, .. } = &mut self.nodes[id.0].kind {
                    *chosen = Some((label, child));
                }
                child
            }
            None => {
                let child = self.alloc(control, Continuation::Response(id));
                if let NodeKind::Request { response, .. } = &mut self.nodes[id.0].kind {
                    *response = Some(child);
                }
                child
            }
        };
        self.work.push(child);

        Ok(())
    }

    /* ===================== Node Actions ===================== */

    fn alloc(&mut self, control: Control<D>, cont: Continuation) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(control.checked(), cont));
        id
    }

    /// First action of an application node
    fn enter(&mut self, id: NodeId) -> EngineResult<()> {
        let NodeKind::Application { app, args, .. } = &self.nodes[id.0].kind else {
            return Err(corrupt(id, "not an application node"));
        };
        if !args.is_empty() {
            return Err(corrupt(id, "application entered twice"));
        }

        let app = app.clone();
        if app.args.is_empty() {
            let control = app.op.reduce(Vec::new());
            return self.attach_result(id, control);
        }

        let children: Vec<NodeId> = app
            .args
            .into_iter()
            .enumerate()
            .map(|(slot, control)| self.alloc(control, Continuation::Argument(id, slot)))
            .collect();

        // Only the leftmost argument is scheduled; the next one is pushed
        // once this one's value is accepted.
        self.work.push(children[0]);
        if let NodeKind::Application { args, .. } = &mut self.nodes[id.0].kind {
            *args = children;
        }
        Ok(())
    }

    /// Build the reducer result tree of an application node and schedule it
    fn attach_result(&mut self, id: NodeId, control: Control<D>) -> EngineResult<()> {
        let child = self.alloc(control, Continuation::Parent(id));
        match &mut self.nodes[id.0].kind {
            NodeKind::Application { result, .. } => *result = Some(child),
            _ => return Err(corrupt(id, "result attached to a non-application node")),
        }
        self.work.push(child);
        Ok(())
    }

    /// Route an outcome from `from` along the continuation chain
    ///
    /// Results and errors pass straight through options, request and
    /// application-result links, recording themselves on every node they
    /// cross. They stop at an argument slot (value) or at the root. An error
    /// reaching an argument slot fails that application instead.
    fn deliver(&mut self, from: NodeId, outcome: Outcome<D>) -> EngineResult<()> {
        let mut current = from;
        loop {
            let node = &mut self.nodes[current.0];
            node.outcome = Some(outcome.clone());
            let cont = node.cont;

            match cont {
                Continuation::Root => {
                    debug!(ok = outcome.is_ok(), "derivation finished");
                    self.outcome = Some(outcome);
                    return Ok(());
                }
                Continuation::Parent(parent) => {
                    self.expect_kind(parent, current, |k| {
                        matches!(k, NodeKind::Options { .. } | NodeKind::Application { .. })
                    })?;
                    current = parent;
                }
                Continuation::Response(parent) => {
                    self.expect_kind(parent, current, |k| matches!(k, NodeKind::Request { .. }))?;
                    current = parent;
                }
                Continuation::Argument(parent, slot) => {
                    if let Ok(value) = &outcome {
                        return self.fill_slot(parent, slot, value.clone());
                    }
                    trace!(node = parent.0, slot, "argument failed, skipping the rest");
                    current = parent;
                }
            }
        }
    }

    /// Accept a value into an argument slot, then schedule the next argument
    /// or reduce once every slot is filled
    fn fill_slot(&mut self, id: NodeId, slot: usize, value: D::Object) -> EngineResult<()> {
        let NodeKind::Application {
            app, args, slots, ..
        } = &mut self.nodes[id.0].kind
        else {
            return Err(corrupt(id, "argument routed to a non-application node"));
        };

        match slots.get_mut(slot) {
            None => return Err(corrupt(id, &format!("no argument slot {slot}"))),
            Some(Some(_)) => {
                warn!(node = id.0, slot, "argument slot filled twice");
                return Err(EngineError::SlotAlreadyFilled { node: id.0, slot });
            }
            Some(cell) => *cell = Some(value),
        }

        if let Some(&next) = args.get(slot + 1) {
            self.work.push(next);
            return Ok(());
        }

        let values: Option<Vec<D::Object>> = slots.iter().cloned().collect();
        let Some(values) = values else {
            return Err(corrupt(id, "reducing with an empty argument slot"));
        };
        let control = app.op.reduce(values);
        self.attach_result(id, control)
    }

    fn expect_kind(
        &self,
        parent: NodeId,
        child: NodeId,
        ok: impl Fn(&NodeKind<D>) -> bool,
    ) -> EngineResult<()> {
        match self.nodes.get(parent.0) {
            Some(node) if ok(&node.kind) => Ok(()),
            Some(node) => Err(corrupt(
                child,
                &format!("continuation points at a {} node", node.kind_name()),
            )),
            None => Err(corrupt(child, "continuation points outside the tree")),
        }
    }
}

impl<D: Domain> Index<NodeId> for ExecutionTree<D> {
    type Output = Node<D>;

    fn index(&self, id: NodeId) -> &Node<D> {
        &self.nodes[id.0]
    }
}

/* ===================== Helpers ===================== */

fn corrupt(id: NodeId, reason: &str) -> EngineError {
    warn!(node = id.0, reason, "corrupt continuation");
    EngineError::CorruptContinuation {
        node: id.0,
        reason: reason.to_string(),
    }
}

fn mismatch(expected: &'static str, found: &'static str) -> EngineError {
    warn!(expected, found, "command does not match pause point");
    EngineError::CommandMismatch { expected, found }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::arith::{self, Arith, Nat};

    fn entered_plus() -> ExecutionTree<Arith> {
        let mut tree = ExecutionTree::new(Control::apply(
            &arith::plus(),
            vec![arith::nat(1), arith::nat(2)],
        ));
        tree.advance().unwrap();
        tree
    }

    #[test]
    fn test_slot_filled_twice() {
        let mut tree = entered_plus();
        tree.fill_slot(NodeId(0), 0, Nat(1)).unwrap();

        assert_eq!(
            tree.fill_slot(NodeId(0), 0, Nat(9)),
            Err(EngineError::SlotAlreadyFilled { node: 0, slot: 0 })
        );
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut tree = entered_plus();
        let Err(EngineError::CorruptContinuation { node: 0, reason }) =
            tree.fill_slot(NodeId(0), 5, Nat(1))
        else {
            unreachable!("Expected corrupt continuation");
        };
        assert_eq!(reason, "no argument slot 5");
    }

    #[test]
    fn test_value_routed_to_non_application() {
        let mut tree = entered_plus();
        assert!(matches!(
            tree.fill_slot(NodeId(1), 0, Nat(1)),
            Err(EngineError::CorruptContinuation { node: 1, .. })
        ));
    }

    #[test]
    fn test_application_entered_twice() {
        let mut tree = entered_plus();
        assert!(matches!(
            tree.enter(NodeId(0)),
            Err(EngineError::CorruptContinuation { node: 0, .. })
        ));
    }
}

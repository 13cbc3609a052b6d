//! Rendering of execution trees
//!
//! A snapshot captures every node of the arena together with the outcome that
//! passed through it, so a derivation can be replayed from it. The record is
//! flat: nodes are listed by id and refer to their children by id, so trees
//! as deep as the evaluator can build are captured, printed and dropped
//! without recursion.

use super::arena::ExecutionTree;
use super::node::{Continuation, NodeId, NodeKind};
use crate::machine::{Control, ControlSnapshot, Domain};
use serde::Serialize;
use std::fmt;

/// Indentation stops growing at this depth; deeper lines are prefixed with
/// their depth instead
const MAX_INDENT_DEPTH: usize = 32;

/// Every node of a tree, indexed by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    pub root: NodeId,
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub continuation: Continuation,
    #[serde(flatten)]
    pub detail: NodeDetail,
    pub outcome: Option<ControlSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t")]
pub enum NodeDetail {
    Object {
        value: ControlSnapshot,
    },
    Error {
        error: ControlSnapshot,
    },
    Options {
        labels: Vec<String>,
        chosen: Option<String>,
        branch: Option<NodeId>,
    },
    Request {
        accepts: Vec<String>,
        response: Option<NodeId>,
    },
    Application {
        operator: String,
        params: Vec<String>,
        slots: Vec<Option<ControlSnapshot>>,
        args: Vec<NodeId>,
        result: Option<NodeId>,
    },
}

impl<D: Domain> ExecutionTree<D> {
    /// Snapshot of the whole tree
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root: self.root(),
            nodes: (0..self.len()).map(|i| self.snapshot_node(NodeId(i))).collect(),
        }
    }

    /// Snapshot of a single node; children are referenced by id
    ///
    /// Panics if `id` does not belong to this tree, like indexing does.
    pub fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        let node = &self[id];

        let detail = match &node.kind {
            NodeKind::Object(v) => NodeDetail::Object {
                value: ControlSnapshot::of(&Control::<D>::Object(v.clone())),
            },
            NodeKind::Error(f) => NodeDetail::Error {
                error: ControlSnapshot::of(&Control::<D>::from(f.clone())),
            },
            NodeKind::Options { tree, chosen } => NodeDetail::Options {
                labels: tree.labels().into_iter().map(String::from).collect(),
                chosen: chosen.as_ref().map(|(label, _)| label.clone()),
                branch: chosen.as_ref().map(|(_, child)| *child),
            },
            NodeKind::Request { request, response } => NodeDetail::Request {
                accepts: request.accepts.iter().map(|t| t.to_string()).collect(),
                response: *response,
            },
            NodeKind::Application {
                app,
                args,
                slots,
                result,
            } => NodeDetail::Application {
                operator: app.op.name.clone(),
                params: app.op.params.clone(),
                slots: slots
                    .iter()
                    .map(|s| {
                        s.as_ref()
                            .map(|v| ControlSnapshot::of(&Control::<D>::Object(v.clone())))
                    })
                    .collect(),
                args: args.clone(),
                result: *result,
            },
        };

        NodeSnapshot {
            id,
            continuation: node.cont,
            detail,
            outcome: node.outcome.as_ref().map(ControlSnapshot::of_outcome::<D>),
        }
    }
}

impl TreeSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.get(id.0)
    }

    /// Ids of the nodes that differ between `self` and a later snapshot of
    /// the same tree; nodes only present in `later` are not listed
    pub fn changed_since(&self, later: &TreeSnapshot) -> Vec<NodeId> {
        self.nodes
            .iter()
            .zip(&later.nodes)
            .filter(|(before, after)| before != after)
            .map(|(before, _)| before.id)
            .collect()
    }
}

/* ===================== Text Rendering ===================== */

impl NodeSnapshot {
    fn role(&self) -> String {
        match self.continuation {
            Continuation::Root => "root".to_string(),
            Continuation::Parent(_) => "then".to_string(),
            Continuation::Argument(_, slot) => format!("arg {slot}"),
            Continuation::Response(_) => "response".to_string(),
        }
    }

    fn head(&self) -> String {
        match &self.detail {
            NodeDetail::Object { value } => value.to_string(),
            NodeDetail::Error { error } => error.to_string(),
            NodeDetail::Options {
                labels, chosen, ..
            } => match chosen {
                Some(label) => format!("options[{}] chose {label}", labels.join(" | ")),
                None => format!("options[{}] waiting", labels.join(" | ")),
            },
            NodeDetail::Request {
                accepts, response, ..
            } => {
                let waiting = if response.is_none() { " waiting" } else { "" };
                format!("request<{}>{waiting}", accepts.join(" | "))
            }
            NodeDetail::Application {
                operator,
                params,
                slots,
                ..
            } => {
                let shown: Vec<String> = slots
                    .iter()
                    .enumerate()
                    .map(|(i, slot)| {
                        let value = slot
                            .as_ref()
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "_".to_string());
                        match params.get(i) {
                            Some(name) => format!("{name}: {value}"),
                            None => value,
                        }
                    })
                    .collect();
                format!("{operator}({})", shown.join(", "))
            }
        }
    }

    /// Children in display order: arguments, then result, branch or response
    pub fn children(&self) -> Vec<NodeId> {
        match &self.detail {
            NodeDetail::Object { .. } | NodeDetail::Error { .. } => Vec::new(),
            NodeDetail::Options { branch, .. } => branch.iter().copied().collect(),
            NodeDetail::Request { response, .. } => response.iter().copied().collect(),
            NodeDetail::Application { args, result, .. } => {
                args.iter().chain(result.iter()).copied().collect()
            }
        }
    }
}

/// One line per node, without indentation
impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.id, self.role(), self.head())?;
        if let Some(outcome) = &self.outcome {
            write!(f, " => {outcome}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut todo = vec![(self.root, 0usize)];
        while let Some((id, depth)) = todo.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if depth > MAX_INDENT_DEPTH {
                write!(f, "{:indent$}[{depth}] ", "", indent = MAX_INDENT_DEPTH * 2)?;
            } else {
                write!(f, "{:indent$}", "", indent = depth * 2)?;
            }
            writeln!(f, "{node}")?;
            todo.extend(node.children().into_iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(())
    }
}

impl<D: Domain> fmt::Display for ExecutionTree<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

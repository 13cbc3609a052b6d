//! Execution-tree nodes and their continuations

use crate::machine::{Application, Control, Domain, Failure, OptionsTree, Outcome, Request};
use serde::Serialize;
use std::fmt;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a node's eventual result or error is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Continuation {
    /// Nowhere; this is the root and its outcome is the tree's outcome
    Root,
    /// The parent's own result (chosen branch of an options node, or the
    /// reduced body of an application node)
    Parent(NodeId),
    /// Argument slot `.1` of the parent application node
    Argument(NodeId, usize),
    /// Response slot of the parent request node
    Response(NodeId),
}

impl Continuation {
    pub fn parent(&self) -> Option<NodeId> {
        match *self {
            Continuation::Root => None,
            Continuation::Parent(p) | Continuation::Argument(p, _) | Continuation::Response(p) => {
                Some(p)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind<D: Domain> {
    Object(D::Object),

    Error(Failure<D>),

    Options {
        tree: OptionsTree<D>,
        /// Chosen label and the branch tree built for it
        chosen: Option<(String, NodeId)>,
    },

    Request {
        request: Request<D>,
        response: Option<NodeId>,
    },

    Application {
        app: Application<D>,
        /// One child per argument, built the first time the node advances
        args: Vec<NodeId>,
        /// Accepted argument values, filled strictly left to right
        slots: Vec<Option<D::Object>>,
        /// Tree for the reducer's result, built once every slot is filled
        result: Option<NodeId>,
    },
}

/// One node of the derivation record
#[derive(Debug, Clone)]
pub struct Node<D: Domain> {
    pub cont: Continuation,
    pub kind: NodeKind<D>,
    /// Result or error that passed through this node, once known
    pub outcome: Option<Outcome<D>>,
}

impl<D: Domain> Node<D> {
    /// Wrap a control in a node typed to its kind
    pub fn new(control: Control<D>, cont: Continuation) -> Self {
        let kind = match control {
            Control::Object(v) => NodeKind::Object(v),
            Control::Error(e) => NodeKind::Error(Failure::Domain(e)),
            Control::SystemError(e) => NodeKind::Error(Failure::System(e)),
            Control::Options(tree) => NodeKind::Options { tree, chosen: None },
            Control::Request(request) => NodeKind::Request {
                request,
                response: None,
            },
            Control::Application(app) => {
                let arity = app.arity();
                NodeKind::Application {
                    app,
                    args: Vec::with_capacity(arity),
                    slots: vec![None; arity],
                    result: None,
                }
            }
        };

        Node {
            cont,
            kind,
            outcome: None,
        }
    }

    /// Options and request nodes still waiting for a command
    pub fn is_paused(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Options { chosen: None, .. } | NodeKind::Request { response: None, .. }
        )
    }

    /// Child trees in display order
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Object(_) | NodeKind::Error(_) => Vec::new(),
            NodeKind::Options { chosen, .. } => chosen.iter().map(|(_, id)| *id).collect(),
            NodeKind::Request { response, .. } => response.iter().copied().collect(),
            NodeKind::Application { args, result, .. } => {
                args.iter().copied().chain(result.iter().copied()).collect()
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Object(_) => "object",
            NodeKind::Error(_) => "error",
            NodeKind::Options { .. } => "options",
            NodeKind::Request { .. } => "request",
            NodeKind::Application { .. } => "application",
        }
    }
}

//! procs
//!
//! a proc is a persistent state machine: a set of state elements plus a
//! node graph computing, once per tick, the next value of each of them.

use std::fmt;

use itertools::Itertools;
use ustr::Ustr;

use crate::channel::ChannelId;
use crate::node::{Node, NodeId};
use crate::types::Type;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StateElement {
    name: Ustr,
    ty: Type,
    init: Value,
}

impl StateElement {
    pub(crate) fn new(name: Ustr, init: Value) -> Self {
        Self {
            name,
            ty: init.ty(),
            init,
        }
    }

    pub fn name(&self) -> Ustr {
        self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn initial_value(&self) -> &Value {
        &self.init
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Proc {
    name: Ustr,
    token: NodeId,
    state: Vec<StateElement>,
    nodes: Vec<Node>,
    next_token: NodeId,
    next_state: Vec<NodeId>,
}

impl Proc {
    pub(crate) fn new(
        name: Ustr,
        token: NodeId,
        state: Vec<StateElement>,
        nodes: Vec<Node>,
        next_token: NodeId,
        next_state: Vec<NodeId>,
    ) -> Self {
        Self {
            name,
            token,
            state,
            nodes,
            next_token,
            next_state,
        }
    }

    pub fn name(&self) -> Ustr {
        self.name
    }

    /// the node producing the proc's input token
    pub fn token_param(&self) -> NodeId {
        self.token
    }

    pub fn state_elements(&self) -> &[StateElement] {
        &self.state
    }

    /// nodes in arena (and topological) order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn next_token(&self) -> NodeId {
        self.next_token
    }

    /// one node per state element, in state element order
    pub fn next_state(&self) -> &[NodeId] {
        &self.next_state
    }

    pub fn initial_state(&self) -> Vec<Value> {
        self.state
            .iter()
            .map(|element| element.initial_value().clone())
            .collect()
    }

    /// channels this proc sends on, in node order, without duplicates
    pub fn send_channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.op().is_send())
            .filter_map(|node| node.op().channel())
            .unique()
    }

    /// channels this proc receives on, in node order, without duplicates
    pub fn receive_channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.op().is_receive())
            .filter_map(|node| node.op().channel())
            .unique()
    }

    /// true if the proc neither sends nor receives
    pub fn is_isolated(&self) -> bool {
        !self.nodes.iter().any(|node| node.op().is_side_effecting())
    }

    pub(crate) fn channel_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.op().channel().is_some())
    }
}

impl fmt::Display for Proc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proc {}(", self.name)?;
        write!(
            f,
            "{}",
            std::iter::once(format!("%{}: token", self.token))
                .chain(
                    self.state
                        .iter()
                        .map(|s| format!("{}: {} = {}", s.name, s.ty, s.init))
                )
                .join(", ")
        )?;
        writeln!(f, ") {{")?;
        for node in self.nodes.iter() {
            writeln!(f, "  %{} {}", node.id(), node)?;
        }
        writeln!(
            f,
            "  next (%{}{})",
            self.next_token,
            self.next_state
                .iter()
                .map(|id| format!(", %{}", id))
                .join("")
        )?;
        write!(f, "}}")
    }
}

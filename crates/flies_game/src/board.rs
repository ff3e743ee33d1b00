//! Fixed board topology.
//!
//! Two edge tables over the same eight nodes: the symmetric adjacency
//! graph the spider moves on, and the directional forward graph that
//! restricts the flies.

use super::types::Node;
use tracing::instrument;

/// One-step reachability over the eight nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graph {
    edges: [&'static [Node]; 8],
}

impl Graph {
    /// Nodes reachable from `from` in one step.
    pub fn neighbors(&self, from: Node) -> &'static [Node] {
        self.edges[from.index()]
    }

    /// Returns true if `to` is one step from `from`.
    #[instrument(skip(self))]
    pub fn connects(&self, from: Node, to: Node) -> bool {
        self.neighbors(from).contains(&to)
    }

    /// Iterates every directed edge in the table.
    pub fn edges(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        Node::ALL
            .into_iter()
            .flat_map(move |from| self.neighbors(from).iter().map(move |&to| (from, to)))
    }
}

/// Spider moves: symmetric adjacency.
pub const ADJACENCY: Graph = Graph {
    edges: [
        &[Node::B, Node::C, Node::D],
        &[Node::A, Node::C, Node::D, Node::E],
        &[Node::A, Node::B, Node::D, Node::G],
        &[Node::A, Node::B, Node::C, Node::E, Node::F, Node::G],
        &[Node::B, Node::D, Node::F, Node::H],
        &[Node::D, Node::E, Node::G, Node::H],
        &[Node::C, Node::D, Node::F, Node::H],
        &[Node::E, Node::F, Node::G],
    ],
};

/// Fly moves: adjacency with the edges back toward `a` removed.
pub const FORWARD: Graph = Graph {
    edges: [
        &[Node::B, Node::C, Node::D],
        &[Node::C, Node::D, Node::E],
        &[Node::B, Node::D, Node::G],
        &[Node::E, Node::F, Node::G],
        &[Node::F, Node::H],
        &[Node::E, Node::G, Node::H],
        &[Node::F, Node::H],
        &[],
    ],
};

/// Nodes the spider may circle between; too many visits hand it the round.
pub const REFUGE_NODES: [Node; 2] = [Node::F, Node::H];

/// The flies' side of the board; the spider wins on reaching any of them.
pub const HOME_NODES: [Node; 4] = [Node::A, Node::B, Node::C, Node::D];

/// The flies win by holding all three of these at once.
pub const CORNERING_NODES: [Node; 3] = [Node::E, Node::F, Node::G];

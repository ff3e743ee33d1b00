//! Move requests and the ways they can be rejected.

use super::types::{Node, Piece, Turn};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A request to move one piece to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The piece being moved.
    pub piece: Piece,
    /// Where it should end up.
    pub target: Node,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(piece: Piece, target: Node) -> Self {
        Self { piece, target }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "move {} {}", self.piece, self.target)
    }
}

/// Why a move was refused. None of these change the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The piece is already on the target node.
    #[display("{piece} is already at {node}")]
    AlreadyThere {
        /// Piece that was asked to move.
        piece: Piece,
        /// Its current node.
        node: Node,
    },

    /// The piece's side may not move now.
    #[display("cannot move {piece}: turn is {turn}")]
    WrongTurn {
        /// Piece that was asked to move.
        piece: Piece,
        /// The turn at the time of the request.
        turn: Turn,
    },

    /// Another piece holds the target node.
    #[display("{node} is already occupied by {occupant}")]
    Occupied {
        /// The target node.
        node: Node,
        /// The piece standing there.
        occupant: Piece,
    },

    /// No edge from the piece's node to the target for its role.
    #[display("{piece} cannot move from {from} to {to}")]
    IllegalEdge {
        /// Piece that was asked to move.
        piece: Piece,
        /// Its current node.
        from: Node,
        /// The requested node.
        to: Node,
    },
}

impl std::error::Error for MoveError {}

/// A successful move, with everything the display needs to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The piece that moved.
    pub piece: Piece,
    /// The node it left.
    pub from: Node,
    /// The node it now occupies.
    pub to: Node,
    /// The turn after the move.
    pub turn: Turn,
}

//! Pure spider-and-flies game logic.
//!
//! One spider chases three flies across a fixed eight-node board. The
//! spider moves along a symmetric adjacency graph; the flies only move
//! forward, away from their starting side.
//!
//! # Example
//!
//! ```
//! use flies_game::{GameState, Node, Piece, Turn};
//!
//! let mut game = GameState::new();
//! game.apply_move(Piece::Pursuer, Node::F).unwrap();
//! assert_eq!(game.turn(), Turn::EvaderTurn);
//! assert_eq!(game.check_win(), None);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod rules;
mod types;
mod win;

pub use action::{Move, MoveError, MoveOutcome};
pub use board::{ADJACENCY, CORNERING_NODES, FORWARD, Graph, HOME_NODES, REFUGE_NODES};
pub use rules::GameState;
pub use types::{EMPTY_LABEL, Node, Piece, Role, Turn, Winner, occupant_label};
pub use win::{REFUGE_THRESHOLD, RefugeTracker};

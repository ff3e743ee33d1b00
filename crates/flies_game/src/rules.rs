//! Game state and move rules for spider-and-flies.

use super::action::{Move, MoveError, MoveOutcome};
use super::board::{ADJACENCY, FORWARD};
use super::types::{Node, Piece, Role, Turn, Winner};
use super::win::{self, RefugeTracker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Where each piece starts, indexed by [`Piece::index`].
const STARTING_LAYOUT: [Node; 4] = [Node::H, Node::B, Node::A, Node::C];

/// Complete state of one round.
///
/// The only mutators are [`GameState::apply_move`], [`GameState::check_win`]
/// and [`GameState::initialize`]; every rule is checked against the current
/// positions and turn on each call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Node held by each piece, indexed by [`Piece::index`].
    positions: [Node; 4],
    /// Current turn.
    turn: Turn,
    /// Consecutive refuge visits by the spider.
    refuge: RefugeTracker,
    /// Set by a spider move, consumed by the next win check.
    spider_moved: bool,
}

impl GameState {
    /// Creates a game in the starting layout with the spider to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            positions: STARTING_LAYOUT,
            turn: Turn::PursuerTurn,
            refuge: RefugeTracker::default(),
            spider_moved: false,
        }
    }

    /// Resets positions, turn and counters to the starting layout.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) {
        debug!("Resetting game to starting layout");
        *self = Self::new();
    }

    /// Node currently held by `piece`.
    pub fn position(&self, piece: Piece) -> Node {
        self.positions[piece.index()]
    }

    /// The piece standing on `node`, if any.
    pub fn piece_at(&self, node: Node) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|&piece| self.position(piece) == node)
    }

    /// Current turn.
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Consecutive refuge visits recorded for `node`.
    pub fn refuge_visits(&self, node: Node) -> u8 {
        self.refuge.visits(node)
    }

    /// Every node with its occupant, in label order.
    pub fn board(&self) -> impl Iterator<Item = (Node, Option<Piece>)> + '_ {
        Node::ALL
            .into_iter()
            .map(move |node| (node, self.piece_at(node)))
    }

    /// Validates and applies a move.
    ///
    /// Checks run in a fixed order: already there, wrong turn, target
    /// occupied, then the edge table for the mover's role. A rejected move
    /// leaves the state untouched.
    #[instrument(skip(self), fields(turn = %self.turn))]
    pub fn apply_move(&mut self, piece: Piece, target: Node) -> Result<MoveOutcome, MoveError> {
        let from = self.position(piece);
        if from == target {
            return Err(MoveError::AlreadyThere { piece, node: from });
        }

        if self.turn.mover() != Some(piece.role()) {
            return Err(MoveError::WrongTurn {
                piece,
                turn: self.turn,
            });
        }

        if let Some(occupant) = self.piece_at(target) {
            return Err(MoveError::Occupied {
                node: target,
                occupant,
            });
        }

        let graph = match piece.role() {
            Role::Pursuer => &ADJACENCY,
            Role::Evader => &FORWARD,
        };
        if !graph.connects(from, target) {
            return Err(MoveError::IllegalEdge {
                piece,
                from,
                to: target,
            });
        }

        self.positions[piece.index()] = target;
        if piece.role() == Role::Pursuer {
            self.spider_moved = true;
        }
        self.flip_turn();

        debug!(%piece, %from, %target, turn = %self.turn, "Move applied");
        Ok(MoveOutcome {
            piece,
            from,
            to: target,
            turn: self.turn,
        })
    }

    /// Applies a [`Move`].
    pub fn apply(&mut self, mov: Move) -> Result<MoveOutcome, MoveError> {
        self.apply_move(mov.piece, mov.target)
    }

    /// Checks the win conditions, in priority order:
    ///
    /// 1. the spider has sat on one refuge node for more than six
    ///    consecutive checks after its own moves;
    /// 2. the spider stands on one of the four home nodes;
    /// 3. all three flies occupy the cornering nodes.
    ///
    /// On a win the turn becomes terminal and counters reset. Calling
    /// again without an intervening spider move never advances the refuge
    /// counts, and once the round is over the same winner is returned.
    #[instrument(skip(self))]
    pub fn check_win(&mut self) -> Option<Winner> {
        match self.turn {
            Turn::WinPursuer => return Some(Winner::Pursuer),
            Turn::WinEvader => return Some(Winner::Evader),
            Turn::PursuerTurn | Turn::EvaderTurn => {}
        }

        let spider = self.position(Piece::Pursuer);
        let flies = Piece::EVADERS.map(|fly| self.position(fly));
        let refuge_check = std::mem::take(&mut self.spider_moved);
        let winner = win::evaluate(&mut self.refuge, spider, &flies, refuge_check)?;

        info!(%winner, "Round won");
        self.turn = winner.turn();
        Some(winner)
    }

    /// Hands the move to the other side.
    fn flip_turn(&mut self) {
        let next = match self.turn {
            Turn::PursuerTurn => Turn::EvaderTurn,
            Turn::EvaderTurn => Turn::PursuerTurn,
            terminal => {
                warn!(turn = %terminal, "Turn flip requested after the round ended");
                terminal
            }
        };
        debug_assert_ne!(next, self.turn, "turn set to the same value twice");
        self.turn = next;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

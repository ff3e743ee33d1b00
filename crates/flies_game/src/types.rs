//! Core domain types for spider-and-flies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Wire label for a board slot with no piece on it.
pub const EMPTY_LABEL: &str = "empty";

/// A vertex of the eight-node board.
///
/// Labels are the lowercase letters `a` through `h`; the flies start
/// on the `a`/`b`/`c` side and the spider starts on `h`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Node {
    /// Node `a`.
    A,
    /// Node `b`.
    B,
    /// Node `c`.
    C,
    /// Node `d`.
    D,
    /// Node `e`.
    E,
    /// Node `f`.
    F,
    /// Node `g`.
    G,
    /// Node `h`.
    H,
}

impl Node {
    /// All nodes in label order.
    pub const ALL: [Node; 8] = [
        Node::A,
        Node::B,
        Node::C,
        Node::D,
        Node::E,
        Node::F,
        Node::G,
        Node::H,
    ];

    /// Dense index (0-7) used by the lookup tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Which side a piece plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Role {
    /// The single spider.
    Pursuer,
    /// One of the three flies.
    Evader,
}

/// One of the four pieces on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Piece {
    /// The spider.
    #[serde(rename = "spider")]
    #[strum(to_string = "spider")]
    Pursuer,
    /// First fly.
    #[serde(rename = "fly1")]
    #[strum(to_string = "fly1")]
    Evader1,
    /// Second fly.
    #[serde(rename = "fly2")]
    #[strum(to_string = "fly2")]
    Evader2,
    /// Third fly.
    #[serde(rename = "fly3")]
    #[strum(to_string = "fly3")]
    Evader3,
}

impl Piece {
    /// All pieces, spider first.
    pub const ALL: [Piece; 4] = [Piece::Pursuer, Piece::Evader1, Piece::Evader2, Piece::Evader3];

    /// The three flies.
    pub const EVADERS: [Piece; 3] = [Piece::Evader1, Piece::Evader2, Piece::Evader3];

    /// Returns the role this piece plays for.
    pub fn role(self) -> Role {
        match self {
            Piece::Pursuer => Role::Pursuer,
            Piece::Evader1 | Piece::Evader2 | Piece::Evader3 => Role::Evader,
        }
    }

    /// Dense index (0-3) into a position table.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Wire label for the occupant of a slot: the piece name or `empty`.
pub fn occupant_label(occupant: Option<Piece>) -> &'static str {
    match occupant {
        Some(piece) => piece.into(),
        None => EMPTY_LABEL,
    }
}

/// Whose move it is, or who has won the round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Turn {
    /// The spider moves next.
    #[serde(rename = "spider")]
    #[strum(to_string = "spider")]
    PursuerTurn,
    /// One of the flies moves next.
    #[serde(rename = "flies")]
    #[strum(to_string = "flies")]
    EvaderTurn,
    /// Terminal: the spider won.
    #[serde(rename = "win-spider")]
    #[strum(to_string = "win-spider")]
    WinPursuer,
    /// Terminal: the flies won.
    #[serde(rename = "win-flies")]
    #[strum(to_string = "win-flies")]
    WinEvader,
}

impl Turn {
    /// Every turn value the presentation peer may be asked to render.
    pub const ALL: [Turn; 4] = [
        Turn::PursuerTurn,
        Turn::EvaderTurn,
        Turn::WinPursuer,
        Turn::WinEvader,
    ];

    /// The role allowed to move, or `None` once the round is over.
    pub fn mover(self) -> Option<Role> {
        match self {
            Turn::PursuerTurn => Some(Role::Pursuer),
            Turn::EvaderTurn => Some(Role::Evader),
            Turn::WinPursuer | Turn::WinEvader => None,
        }
    }

    /// Returns true for the two win values.
    pub fn is_terminal(self) -> bool {
        self.mover().is_none()
    }
}

/// Outcome of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Winner {
    /// The spider won.
    Pursuer,
    /// The flies won.
    Evader,
}

impl Winner {
    /// The terminal turn value announcing this result.
    pub fn turn(self) -> Turn {
        match self {
            Winner::Pursuer => Turn::WinPursuer,
            Winner::Evader => Turn::WinEvader,
        }
    }
}

//! Text frames exchanged with the presentation service.
//!
//! A frame is an `event: <kind>` line, one or more `data: <payload>` lines
//! and a blank line. Inbound frames are classified once, at the boundary,
//! into [`Inbound`]; the session never looks at raw payload text.

use derive_more::{Display, Error};
use derive_new::new;
use flies_game::{GameState, MoveOutcome, Move, Node, Piece, Turn, Winner, occupant_label};
use strum::Display as StrumDisplay;
use tracing::instrument;

/// Event kinds this program sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum EventKind {
    /// Identifies this application to the presentation service.
    #[strum(to_string = "appConnect")]
    AppConnect,
    /// Carries a `provide` or `update` payload.
    #[strum(to_string = "message")]
    Message,
}

/// One protocol frame.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Frame {
    /// Contents of the `event:` line.
    pub event: String,
    /// Contents of each `data:` line, in order.
    pub data: Vec<String>,
}

impl Frame {
    /// Builds an outbound frame of a known kind.
    pub fn outbound(kind: EventKind, data: Vec<String>) -> Self {
        Self::new(kind.to_string(), data)
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "event: {}", self.event)?;
        for line in &self.data {
            writeln!(f, "data: {line}")?;
        }
        writeln!(f)
    }
}

// ─────────────────────────────────────────────────────────────
//  Inbound classification
// ─────────────────────────────────────────────────────────────

/// What the peer meant by a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// The peer accepted the previous frame.
    Ack,
    /// The peer asks for a piece to be moved.
    Command(Move),
    /// Anything else; carries a short reason for the logs.
    Unknown(String),
}

impl Inbound {
    /// Classifies a frame. Move commands take precedence over acknowledgements.
    #[instrument(skip(frame), fields(event = %frame.event))]
    pub fn classify(frame: &Frame) -> Self {
        let mut reason = None;
        for payload in &frame.data {
            match parse_move(payload) {
                Ok(mov) => return Inbound::Command(mov),
                Err(CommandParseError::NoMoveKeyword) => {}
                Err(e) => reason = Some(e.to_string()),
            }
        }

        if frame.data.iter().any(|payload| is_ack(payload)) {
            return Inbound::Ack;
        }

        Inbound::Unknown(reason.unwrap_or_else(|| format!("unrecognized payload {:?}", frame.data)))
    }
}

/// Why a payload could not be read as a move command.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CommandParseError {
    /// No `move` keyword in the payload.
    #[display("no move keyword")]
    NoMoveKeyword,
    /// `move` was not followed by a piece and a node.
    #[display("move command is missing its piece or node")]
    Truncated,
    /// The piece name is not one of the four pieces.
    #[display("unknown piece {_0:?}")]
    UnknownPiece(#[error(not(source))] String),
    /// The node label is not one of `a`-`h`.
    #[display("unknown node {_0:?}")]
    UnknownNode(#[error(not(source))] String),
}

/// Extracts `move <piece> <node>` from anywhere in a payload.
#[instrument]
pub fn parse_move(payload: &str) -> Result<Move, CommandParseError> {
    let tokens: Vec<&str> = payload.split_whitespace().collect();
    let at = tokens
        .iter()
        .position(|token| token.ends_with("move"))
        .ok_or(CommandParseError::NoMoveKeyword)?;

    let word = |token: &str| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()).to_string();
    let (piece, node) = match (tokens.get(at + 1), tokens.get(at + 2)) {
        (Some(piece), Some(node)) => (word(piece), word(node)),
        _ => return Err(CommandParseError::Truncated),
    };

    let piece: Piece = piece
        .parse()
        .map_err(|_| CommandParseError::UnknownPiece(piece))?;
    let target: Node = node
        .parse()
        .map_err(|_| CommandParseError::UnknownNode(node))?;
    Ok(Move::new(piece, target))
}

fn is_ack(payload: &str) -> bool {
    payload
        .split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("ok"))
}

// ─────────────────────────────────────────────────────────────
//  Outbound frames
// ─────────────────────────────────────────────────────────────

/// One slot change inside an `update` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Sets what a board node shows.
    Board(Node, Option<Piece>),
    /// Sets the turn indicator.
    Turn(Turn),
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Board(node, occupant) => write!(f, "C .board.{node} {}", occupant_label(*occupant)),
            Change::Turn(turn) => write!(f, "C .turn {turn}"),
        }
    }
}

/// The `appConnect` frame announcing this client.
#[instrument]
pub fn handshake(identity: &str) -> Frame {
    Frame::outbound(EventKind::AppConnect, vec![identity.to_string()])
}

/// The `provide` frame listing every slot state the peer may be asked to show.
#[instrument]
pub fn provide(app_name: &str) -> Frame {
    let occupants = Piece::ALL.map(Some).into_iter().chain([None]);
    let mut data = vec![format!("provide {app_name}")];
    for node in Node::ALL {
        for occupant in occupants.clone() {
            data.push(format!("P .board.{node}/{}", occupant_label(occupant)));
        }
    }
    for turn in Turn::ALL {
        data.push(format!("P .turn/{turn}"));
    }
    Frame::outbound(EventKind::Message, data)
}

/// An `update` frame carrying the given changes.
#[instrument]
pub fn update(app_name: &str, changes: &[Change]) -> Frame {
    let data = std::iter::once(format!("update {app_name}"))
        .chain(changes.iter().map(Change::to_string))
        .collect();
    Frame::outbound(EventKind::Message, data)
}

/// Changes for a completed move: new node filled, old node emptied, turn handed over.
#[instrument]
pub fn move_changes(outcome: &MoveOutcome) -> [Change; 3] {
    [
        Change::Board(outcome.to, Some(outcome.piece)),
        Change::Board(outcome.from, None),
        Change::Turn(outcome.turn),
    ]
}

/// Changes that redraw the whole board and turn from a game state.
#[instrument(skip(game))]
pub fn board_changes(game: &GameState) -> Vec<Change> {
    game.board()
        .map(|(node, occupant)| Change::Board(node, occupant))
        .chain([Change::Turn(game.turn())])
        .collect()
}

/// The terminal turn change announcing a result.
#[instrument]
pub fn win_changes(winner: Winner) -> [Change; 1] {
    [Change::Turn(winner.turn())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str]) -> Frame {
        Frame::new("message".to_string(), lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_frame_encoding() {
        let encoded = handshake("doflies").to_string();
        assert_eq!(encoded, "event: appConnect\ndata: doflies\n\n");
    }

    #[test]
    fn test_event_kind_wire_names() {
        assert_eq!(EventKind::AppConnect.to_string(), "appConnect");
        assert_eq!(EventKind::Message.to_string(), "message");
    }

    #[test]
    fn test_win_changes() {
        assert_eq!(win_changes(Winner::Pursuer)[0].to_string(), "C .turn win-spider");
        assert_eq!(win_changes(Winner::Evader)[0].to_string(), "C .turn win-flies");
    }

    #[test]
    fn test_parse_move_anywhere_in_payload() {
        assert_eq!(
            parse_move("click move fly2 d"),
            Ok(Move::new(Piece::Evader2, Node::D))
        );
        assert_eq!(
            parse_move("move spider f."),
            Ok(Move::new(Piece::Pursuer, Node::F))
        );
    }

    #[test]
    fn test_parse_move_failures() {
        assert_eq!(parse_move("ok"), Err(CommandParseError::NoMoveKeyword));
        assert_eq!(parse_move("move fly1"), Err(CommandParseError::Truncated));
        assert_eq!(
            parse_move("move ant a"),
            Err(CommandParseError::UnknownPiece("ant".to_string()))
        );
        assert_eq!(
            parse_move("move fly1 z"),
            Err(CommandParseError::UnknownNode("z".to_string()))
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(Inbound::classify(&frame(&["ok"])), Inbound::Ack);
        assert_eq!(Inbound::classify(&frame(&["OK ready"])), Inbound::Ack);
        assert_eq!(
            Inbound::classify(&frame(&["move spider e"])),
            Inbound::Command(Move::new(Piece::Pursuer, Node::E))
        );
        assert!(matches!(Inbound::classify(&frame(&["token"])), Inbound::Unknown(_)));
        assert!(matches!(
            Inbound::classify(&frame(&["move beetle a"])),
            Inbound::Unknown(reason) if reason.contains("beetle")
        ));
    }

    #[test]
    fn test_provide_lists_every_slot() {
        let provide = provide("fliesdemo");
        assert_eq!(provide.event, "message");
        assert_eq!(provide.data[0], "provide fliesdemo");
        assert_eq!(provide.data.len(), 1 + 8 * 5 + 4);
        assert!(provide.data.contains(&"P .board.h/spider".to_string()));
        assert!(provide.data.contains(&"P .board.d/empty".to_string()));
        assert!(provide.data.contains(&"P .turn/win-flies".to_string()));
    }

    #[test]
    fn test_move_update() {
        let mut game = GameState::new();
        let outcome = game.apply_move(Piece::Pursuer, Node::F).unwrap();
        let frame = update("fliesdemo", &move_changes(&outcome));
        assert_eq!(
            frame.to_string(),
            "event: message\n\
             data: update fliesdemo\n\
             data: C .board.f spider\n\
             data: C .board.h empty\n\
             data: C .turn flies\n\n"
        );
    }

    #[test]
    fn test_board_changes_cover_every_node() {
        let changes = board_changes(&GameState::new());
        assert_eq!(changes.len(), 9);
        assert_eq!(changes[0].to_string(), "C .board.a fly2");
        assert_eq!(changes[7].to_string(), "C .board.h spider");
        assert_eq!(changes[8].to_string(), "C .turn spider");
    }
}

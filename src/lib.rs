//! Spider-and-flies session for a remote presentation service.
//!
//! The game rules live in [`flies_game`]; this crate speaks the line-based
//! frame protocol and drives one game per connection.
//!
//! # Architecture
//!
//! - **Protocol**: frame type, inbound classification, outbound builders
//! - **Codec**: async frame reader and writer
//! - **Session**: handshake, rounds, win announcements
//! - **Config**: TOML-backed connection settings
//!
//! # Example
//!
//! ```no_run
//! use fliesdemo::{Session, SessionConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SessionConfig::default();
//! let stream = tokio::net::TcpStream::connect(config.address()).await?;
//! let report = Session::over(stream, config).run().await?;
//! println!("{} rounds played", report.rounds_completed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod config;
mod error;
mod protocol;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, SessionConfig};

// Crate-level exports - Errors
pub use error::{SessionError, SessionErrorKind};

// Crate-level exports - Protocol
pub use codec::{FrameReader, FrameWriter};
pub use protocol::{
    Change, CommandParseError, EventKind, Frame, Inbound, board_changes, handshake, move_changes,
    parse_move, provide, update, win_changes,
};

// Crate-level exports - Session
pub use session::{Session, SessionReport};

// Crate-level exports - Game types
pub use flies_game::{GameState, Move, MoveError, Node, Piece, Turn, Winner};

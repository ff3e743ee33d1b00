//! Session error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong with a session.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// The peer answered with something other than an acknowledgement.
    #[display("Protocol mismatch while awaiting {context}: got {received:?}")]
    ProtocolMismatch {
        /// What the session was waiting for.
        context: String,
        /// The offending frame, as received.
        received: String,
    },

    /// The peer hung up while a frame was still unacknowledged.
    #[display("Connection closed while awaiting {_0}")]
    ConnectionClosed(String),

    /// Reading from or writing to the stream failed.
    #[display("I/O error: {_0}")]
    Io(String),
}

/// Session error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// Error kind.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns true if the peer broke the acknowledgement discipline.
    pub fn is_protocol_mismatch(&self) -> bool {
        matches!(self.kind, SessionErrorKind::ProtocolMismatch { .. })
    }
}

impl From<std::io::Error> for SessionError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(SessionErrorKind::Io(err.to_string()))
    }
}

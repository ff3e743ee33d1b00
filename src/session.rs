//! Session loop against the presentation service.
//!
//! One [`Session`] owns one connection and one [`GameState`]. Every frame
//! it sends must be acknowledged before anything else is read or sent.

use crate::codec::{FrameReader, FrameWriter};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionErrorKind};
use crate::protocol::{self, Frame, Inbound};
use derive_getters::Getters;
use flies_game::{GameState, Move, Winner};
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, BufReader, ReadHalf, WriteHalf};
use tracing::{debug, info, instrument, warn};

/// Totals for a finished session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct SessionReport {
    /// Rounds that ended in a win.
    rounds_completed: u32,
    /// Moves accepted by the rules.
    moves_applied: u32,
    /// Moves refused by the rules.
    moves_rejected: u32,
    /// Winner of each completed round, in order.
    winners: Vec<Winner>,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    /// Someone won; another round follows.
    Won(Winner),
    /// The peer closed the connection.
    Closed,
}

/// A live connection driving one game at a time.
#[derive(Debug)]
pub struct Session<R, W> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    config: SessionConfig,
    game: GameState,
    /// Set while a win is being announced; moves arriving then are dropped.
    announcing_win: bool,
    report: SessionReport,
}

impl<S> Session<BufReader<ReadHalf<S>>, WriteHalf<S>>
where
    S: AsyncRead + AsyncWrite,
{
    /// Creates a session over a bidirectional stream such as a TCP socket.
    pub fn over(stream: S, config: SessionConfig) -> Self {
        let (read, write) = tokio::io::split(stream);
        Self::new(BufReader::new(read), write, config)
    }
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a session from separate read and write halves.
    #[instrument(skip(reader, writer))]
    pub fn new(reader: R, writer: W, config: SessionConfig) -> Self {
        Self {
            reader: FrameReader::new(reader),
            writer: FrameWriter::new(writer),
            config,
            game: GameState::new(),
            announcing_win: false,
            report: SessionReport::default(),
        }
    }

    /// Runs handshake and rounds until the peer closes the connection.
    ///
    /// A clean close between frames ends the session with its report. A
    /// handshake or acknowledgement that does not match, or a close while a
    /// frame is still unacknowledged, ends it with an error.
    #[instrument(skip(self), fields(app = %self.config.app_name()))]
    pub async fn run(mut self) -> Result<SessionReport, SessionError> {
        let handshake = protocol::handshake(self.config.client_identity());
        self.send_and_confirm(&handshake, "handshake").await?;
        info!("✅ Presentation service accepted handshake");

        loop {
            self.start_round().await?;
            match self.play_round().await? {
                RoundEnd::Won(winner) => {
                    self.report.rounds_completed += 1;
                    self.report.winners.push(winner);
                    info!(%winner, rounds = self.report.rounds_completed, "Round complete, starting another");
                }
                RoundEnd::Closed => {
                    info!(report = ?self.report, "Presentation service closed the connection");
                    return Ok(self.report);
                }
            }
        }
    }

    /// Resets the game and brings the peer's display in line with it.
    #[instrument(skip(self))]
    async fn start_round(&mut self) -> Result<(), SessionError> {
        self.game.initialize();

        let provide = protocol::provide(self.config.app_name());
        self.send_and_confirm(&provide, "provide").await?;

        if self.report.rounds_completed > 0 {
            let reset = protocol::update(
                self.config.app_name(),
                &protocol::board_changes(&self.game),
            );
            self.send_and_confirm(&reset, "board reset").await?;
        }

        info!(round = self.report.rounds_completed + 1, "Round started");
        Ok(())
    }

    /// Handles inbound frames until a win or a clean close.
    #[instrument(skip(self))]
    async fn play_round(&mut self) -> Result<RoundEnd, SessionError> {
        loop {
            let Some(frame) = self.reader.read_frame().await? else {
                return Ok(RoundEnd::Closed);
            };

            let mov = match Inbound::classify(&frame) {
                Inbound::Command(mov) => mov,
                Inbound::Ack => {
                    debug!("Stray acknowledgement");
                    continue;
                }
                Inbound::Unknown(reason) => {
                    debug!(%reason, "Ignoring frame");
                    continue;
                }
            };

            if let Some(winner) = self.handle_move(mov).await? {
                self.announce_win(winner).await?;
                return Ok(RoundEnd::Won(winner));
            }
        }
    }

    /// Applies one move request and mirrors the result to the peer.
    ///
    /// Rejected moves are only logged; the protocol has no rejection frame.
    #[instrument(skip(self))]
    async fn handle_move(&mut self, mov: Move) -> Result<Option<Winner>, SessionError> {
        let outcome = match self.game.apply(mov) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Move rejected");
                self.report.moves_rejected += 1;
                return Ok(None);
            }
        };
        self.report.moves_applied += 1;

        let delta = protocol::update(self.config.app_name(), &protocol::move_changes(&outcome));
        self.send_and_confirm(&delta, "move update").await?;

        Ok(self.game.check_win())
    }

    /// Pauses so the peer can show the final position, then sends the result.
    #[instrument(skip(self))]
    async fn announce_win(&mut self, winner: Winner) -> Result<(), SessionError> {
        self.announcing_win = true;
        let grace = self.config.win_grace();
        debug!(?grace, "Holding before win announcement");
        tokio::time::sleep(grace).await;

        let frame = protocol::update(self.config.app_name(), &protocol::win_changes(winner));
        let sent = self.send_and_confirm(&frame, "win announcement").await;
        self.announcing_win = false;
        sent?;

        info!(%winner, "🏆 Win announced");
        Ok(())
    }

    /// Sends a frame and waits for its acknowledgement.
    async fn send_and_confirm(&mut self, frame: &Frame, context: &str) -> Result<(), SessionError> {
        self.writer.write_frame(frame).await?;
        self.await_ack(context).await
    }

    #[instrument(skip(self))]
    async fn await_ack(&mut self, context: &str) -> Result<(), SessionError> {
        loop {
            let frame = self.reader.read_frame().await?.ok_or_else(|| {
                SessionError::new(SessionErrorKind::ConnectionClosed(context.to_string()))
            })?;

            match Inbound::classify(&frame) {
                Inbound::Ack => return Ok(()),
                Inbound::Command(mov) if self.announcing_win => {
                    debug!(%mov, "Dropping move sent during win announcement");
                }
                Inbound::Unknown(reason) if self.announcing_win => {
                    debug!(%reason, "Ignoring frame during win announcement");
                }
                _ => {
                    warn!(context, ?frame, "Expected acknowledgement");
                    return Err(SessionError::new(SessionErrorKind::ProtocolMismatch {
                        context: context.to_string(),
                        received: frame.to_string(),
                    }));
                }
            }
        }
    }
}

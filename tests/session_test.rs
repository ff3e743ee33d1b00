//! Tests for the session loop, with the test acting as presentation service.

use fliesdemo::{
    Frame, FrameReader, FrameWriter, Session, SessionConfig, SessionError, SessionErrorKind,
    SessionReport, Winner,
};
use std::time::Duration;
use tokio::io::{BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

/// The presentation side of a duplex connection.
struct Peer {
    reader: FrameReader<BufReader<ReadHalf<DuplexStream>>>,
    writer: FrameWriter<WriteHalf<DuplexStream>>,
}

impl Peer {
    async fn expect(&mut self) -> Frame {
        self.reader
            .read_frame()
            .await
            .expect("read from session")
            .expect("session closed early")
    }

    async fn send(&mut self, payload: &str) {
        let frame = Frame::new("message".to_string(), vec![payload.to_string()]);
        self.writer.write_frame(&frame).await.expect("write to session");
    }

    async fn ack(&mut self) {
        self.send("ok").await;
    }

    /// Sends a move and returns the update it produced, acknowledging it.
    async fn play(&mut self, command: &str) -> Vec<String> {
        self.send(command).await;
        let update = self.expect().await;
        self.ack().await;
        update.data
    }

    /// Accepts the handshake and the first provide frame.
    async fn open(&mut self) {
        let handshake = self.expect().await;
        assert_eq!(handshake.event, "appConnect");
        assert_eq!(handshake.data, vec!["doflies".to_string()]);
        self.ack().await;

        let provide = self.expect().await;
        assert_eq!(provide.data[0], "provide fliesdemo");
        self.ack().await;
    }
}

fn start() -> (Peer, JoinHandle<Result<SessionReport, SessionError>>) {
    start_with_grace(Duration::ZERO)
}

fn start_with_grace(grace: Duration) -> (Peer, JoinHandle<Result<SessionReport, SessionError>>) {
    let (ours, theirs) = tokio::io::duplex(64 * 1024);
    let config = SessionConfig::default().with_win_grace(grace);
    let handle = tokio::spawn(Session::over(ours, config).run());

    let (read, write) = tokio::io::split(theirs);
    let peer = Peer {
        reader: FrameReader::new(BufReader::new(read)),
        writer: FrameWriter::new(write),
    };
    (peer, handle)
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_moves_are_mirrored_as_updates() {
    let (mut peer, session) = start();
    peer.open().await;

    assert_eq!(
        peer.play("move spider f").await,
        lines(&[
            "update fliesdemo",
            "C .board.f spider",
            "C .board.h empty",
            "C .turn flies",
        ])
    );

    // Rejected moves, noise and stray acknowledgements produce no frames.
    peer.send("move spider h").await;
    peer.send("hello there").await;
    peer.send("move beetle a").await;
    peer.ack().await;

    assert_eq!(
        peer.play("move fly1 e").await,
        lines(&[
            "update fliesdemo",
            "C .board.e fly1",
            "C .board.b empty",
            "C .turn spider",
        ])
    );

    drop(peer);
    let report = session.await.unwrap().unwrap();
    assert_eq!(*report.moves_applied(), 2);
    assert_eq!(*report.moves_rejected(), 1);
    assert_eq!(*report.rounds_completed(), 0);
}

#[tokio::test]
async fn test_bad_handshake_reply_aborts() {
    let (mut peer, session) = start();
    peer.expect().await;
    peer.send("denied").await;

    let err = session.await.unwrap().unwrap_err();
    assert!(err.is_protocol_mismatch(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_close_before_ack_is_an_error() {
    let (mut peer, session) = start();
    peer.open().await;
    peer.send("move spider e").await;
    peer.expect().await;
    drop(peer);

    let err = session.await.unwrap().unwrap_err();
    assert_eq!(
        err.kind,
        SessionErrorKind::ConnectionClosed("move update".to_string())
    );
}

#[tokio::test]
async fn test_command_instead_of_ack_aborts() {
    let (mut peer, session) = start();
    peer.open().await;
    peer.send("move spider e").await;
    peer.expect().await;
    peer.send("move fly2 d").await;

    let err = session.await.unwrap().unwrap_err();
    assert!(err.is_protocol_mismatch());
}

#[tokio::test]
async fn test_win_is_announced_and_board_reset() {
    let (mut peer, session) = start();
    peer.open().await;

    for command in [
        "move spider e",
        "move fly3 g",
        "move spider h",
        "move fly1 e",
        "move spider f",
        "move fly2 d",
        "move spider h",
    ] {
        peer.play(command).await;
    }
    peer.play("move fly2 f").await;

    let announcement = peer.expect().await;
    assert_eq!(
        announcement.data,
        lines(&["update fliesdemo", "C .turn win-flies"])
    );
    // Moves sent while the result is on screen are dropped.
    peer.send("move spider g").await;
    peer.ack().await;

    let provide = peer.expect().await;
    assert_eq!(provide.data[0], "provide fliesdemo");
    peer.ack().await;

    let reset = peer.expect().await;
    assert_eq!(
        reset.data,
        lines(&[
            "update fliesdemo",
            "C .board.a fly2",
            "C .board.b fly1",
            "C .board.c fly3",
            "C .board.d empty",
            "C .board.e empty",
            "C .board.f empty",
            "C .board.g empty",
            "C .board.h spider",
            "C .turn spider",
        ])
    );
    peer.ack().await;

    // The new round starts from the opening layout.
    assert_eq!(
        peer.play("move spider g").await,
        lines(&[
            "update fliesdemo",
            "C .board.g spider",
            "C .board.h empty",
            "C .turn flies",
        ])
    );

    drop(peer);
    let report = session.await.unwrap().unwrap();
    assert_eq!(*report.rounds_completed(), 1);
    assert_eq!(report.winners(), &vec![Winner::Evader]);
    assert_eq!(*report.moves_applied(), 9);
}

#[tokio::test]
async fn test_spider_reaching_home_wins() {
    let (mut peer, session) = start();
    peer.open().await;

    for command in ["move spider e", "move fly2 d", "move spider f", "move fly2 g"] {
        peer.play(command).await;
    }
    peer.play("move spider d").await;

    let announcement = peer.expect().await;
    assert_eq!(
        announcement.data,
        lines(&["update fliesdemo", "C .turn win-spider"])
    );
    peer.ack().await;
    peer.expect().await;

    drop(peer);
    let err = session.await.unwrap().unwrap_err();
    assert_eq!(
        err.kind,
        SessionErrorKind::ConnectionClosed("provide".to_string())
    );
}

#[tokio::test]
async fn test_refuge_win_is_announced_after_grace() {
    let grace = Duration::from_millis(200);
    let (mut peer, session) = start_with_grace(grace);
    peer.open().await;

    for check in 1..13 {
        let spider = if check % 2 == 1 { "move spider f" } else { "move spider h" };
        peer.play(spider).await;
        let fly = match check {
            1 => "move fly2 d",
            2 => "move fly3 g",
            odd if odd % 2 == 1 => "move fly1 c",
            _ => "move fly1 b",
        };
        peer.play(fly).await;
    }

    // Thirteenth alternating refuge visit.
    peer.send("move spider f").await;
    let update = peer.expect().await;
    assert_eq!(update.data[1], "C .board.f spider");
    let acked_at = tokio::time::Instant::now();
    peer.ack().await;

    let announcement = peer.expect().await;
    assert!(
        acked_at.elapsed() >= grace,
        "announced after {:?}",
        acked_at.elapsed()
    );
    assert_eq!(
        announcement.data,
        lines(&["update fliesdemo", "C .turn win-spider"])
    );
    peer.ack().await;

    let provide = peer.expect().await;
    assert_eq!(provide.data[0], "provide fliesdemo");

    drop(peer);
    let err = session.await.unwrap().unwrap_err();
    assert_eq!(
        err.kind,
        SessionErrorKind::ConnectionClosed("provide".to_string())
    );
}

#[tokio::test]
async fn test_noise_during_win_announcement_is_ignored() {
    let (mut peer, session) = start();
    peer.open().await;

    for command in ["move spider e", "move fly2 d", "move spider f", "move fly2 g"] {
        peer.play(command).await;
    }
    peer.play("move spider d").await;

    let announcement = peer.expect().await;
    assert_eq!(
        announcement.data,
        lines(&["update fliesdemo", "C .turn win-spider"])
    );
    peer.send("hello there").await;
    peer.send("move beetle a").await;
    peer.ack().await;

    let provide = peer.expect().await;
    assert_eq!(provide.data[0], "provide fliesdemo");
    peer.ack().await;
    let reset = peer.expect().await;
    assert_eq!(reset.data.last().map(String::as_str), Some("C .turn spider"));
    peer.ack().await;

    drop(peer);
    let report = session.await.unwrap().unwrap();
    assert_eq!(report.winners(), &vec![Winner::Pursuer]);
}

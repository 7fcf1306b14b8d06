#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;

use pitchside_api::protocol::monitor_codec;
use pitchside_api::{LinkState, MonitorCommand, MonitorConfig, MonitorHandle, Team};

const WAIT: Duration = Duration::from_secs(5);

async fn local_server() -> (TcpListener, MonitorConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = MonitorConfig {
        host: "127.0.0.1".into(),
        port,
        ..MonitorConfig::default()
    };
    (listener, config)
}

async fn wait_for_state(handle: &MonitorHandle, wanted: LinkState) {
    let mut rx = handle.subscribe();
    timeout(WAIT, rx.wait_for(|s| *s == wanted))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn auto_connect_delivers_framed_commands() {
    let (listener, config) = local_server().await;
    let handle = MonitorHandle::spawn(config, CancellationToken::new());

    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    wait_for_state(&handle, LinkState::Connected).await;

    handle.send(MonitorCommand::kick_off(Team::Left));
    handle.send(MonitorCommand::RequestFullState);

    let mut frames = FramedRead::new(socket, monitor_codec());
    let first = timeout(WAIT, frames.next()).await.unwrap().unwrap().unwrap();
    let second = timeout(WAIT, frames.next()).await.unwrap().unwrap().unwrap();

    assert_eq!(&first[..], b"(playMode KickOff_Left)");
    assert_eq!(&second[..], b"(reqfullstate)");
}

#[tokio::test]
async fn manual_link_waits_for_connect_and_drops_early_commands() {
    let (listener, config) = local_server().await;
    let handle = MonitorHandle::spawn(
        MonitorConfig {
            auto_connect: false,
            ..config
        },
        CancellationToken::new(),
    );

    handle.send(MonitorCommand::DropBall);
    assert_eq!(handle.state(), LinkState::Disconnected);

    handle.connect();
    handle.send(MonitorCommand::ResetTime);

    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    wait_for_state(&handle, LinkState::Connected).await;

    let mut frames = FramedRead::new(socket, monitor_codec());
    let first = timeout(WAIT, frames.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(&first[..], b"(time 0)");
}

#[tokio::test]
async fn server_close_reports_disconnect() {
    let (listener, config) = local_server().await;
    let handle = MonitorHandle::spawn(
        MonitorConfig {
            auto_connect: false,
            ..config
        },
        CancellationToken::new(),
    );
    handle.connect();

    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    wait_for_state(&handle, LinkState::Connected).await;

    drop(socket);
    wait_for_state(&handle, LinkState::Disconnected).await;
}

#[tokio::test]
async fn refused_connection_never_reports_connected() {
    let (listener, config) = local_server().await;
    drop(listener);

    let handle = MonitorHandle::spawn(
        MonitorConfig {
            auto_connect: false,
            ..config
        },
        CancellationToken::new(),
    );
    handle.connect();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_ne!(handle.state(), LinkState::Connected);
}

#[tokio::test]
async fn inbound_frames_publish_game_state_until_disconnect() {
    let (listener, config) = local_server().await;
    let handle = MonitorHandle::spawn(
        MonitorConfig {
            auto_connect: false,
            ..config
        },
        CancellationToken::new(),
    );
    let mut game = handle.game_state();
    assert!(game.borrow().is_none());
    handle.connect();

    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    let mut frames = FramedWrite::new(socket, monitor_codec());
    frames
        .send(Bytes::from_static(
            b"((play_modes BeforeKickOff KickOff_Left)(time 0)(play_mode 0))(RSG 0 1)",
        ))
        .await
        .unwrap();
    frames
        .send(Bytes::from_static(b"((t 3.5)(pm 1)(sr 1))"))
        .await
        .unwrap();

    let state = timeout(
        WAIT,
        game.wait_for(|s| s.as_ref().is_some_and(|s| s.play_mode == "KickOff_Left")),
    )
    .await
    .unwrap()
    .unwrap()
    .clone()
    .unwrap();
    assert!(state.initialized);
    assert_eq!(state.score_right, 1);
    assert_eq!(state.play_modes, ["BeforeKickOff", "KickOff_Left"]);

    drop(frames);
    timeout(WAIT, game.wait_for(Option::is_none))
        .await
        .unwrap()
        .unwrap();
}

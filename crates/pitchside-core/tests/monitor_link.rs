#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures::StreamExt;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;

use pitchside_api::protocol::monitor_codec;
use pitchside_core::{ConnectionStatus, LinkConfig, MonitorLink, ServerLink, ServerPoint, Side};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn commands_reach_the_server_in_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = LinkConfig {
        host: "127.0.0.1".into(),
        port: listener.local_addr().unwrap().port(),
        ..LinkConfig::default()
    };

    let mut link = MonitorLink::spawn(&config, CancellationToken::new()).unwrap();
    let (socket, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();

    let mut states = link.subscribe();
    timeout(WAIT, states.wait_for(|s| s.is_connected()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(link.status(), ConnectionStatus::Connected);

    link.kick_off(Side::Right);
    link.move_agent(ServerPoint::new(-2.0, 3.0, 0.4), Side::Left, 9);

    let mut frames = FramedRead::new(socket, monitor_codec());
    let first = timeout(WAIT, frames.next()).await.unwrap().unwrap().unwrap();
    let second = timeout(WAIT, frames.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(&first[..], b"(playMode KickOff_Right)");
    assert_eq!(
        &second[..],
        b"(agent (unum 9) (team Left) (pos -2.00 3.00 0.40))"
    );

    link.shutdown();
}

#[tokio::test]
async fn invalid_config_is_rejected_before_spawning() {
    let config = LinkConfig {
        port: 0,
        ..LinkConfig::default()
    };
    assert!(MonitorLink::spawn(&config, CancellationToken::new()).is_err());
}

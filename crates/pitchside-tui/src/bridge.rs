//! Link bridge: forwards monitor link state and decoded game state into the
//! action channel.
//!
//! The watch receivers may coalesce rapid transitions; whatever state is
//! current when the bridge wakes is what the controller sees, in order.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pitchside_api::{GameState, LinkState};
use pitchside_core::{ConnectionStatus, PlayState};

use crate::action::Action;

pub async fn run_link_bridge(
    mut states: watch::Receiver<LinkState>,
    mut games: watch::Receiver<Option<GameState>>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut last = ConnectionStatus::from(*states.borrow_and_update());
    if action_tx.send(Action::Connection(last)).is_err() {
        return;
    }
    let mut games_open = true;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = states.changed() => {
                if changed.is_err() {
                    debug!("link state channel closed");
                    break;
                }
                let status = ConnectionStatus::from(*states.borrow_and_update());
                if status == last {
                    continue;
                }
                last = status;
                if action_tx.send(Action::Connection(status)).is_err() {
                    break;
                }
            }
            changed = games.changed(), if games_open => {
                if changed.is_err() {
                    games_open = false;
                    continue;
                }
                // Cleared on disconnect; the link state already says so.
                let Some(state) = games.borrow_and_update().as_ref().map(PlayState::from) else {
                    continue;
                };
                if action_tx.send(Action::PlayState(state)).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pitchside_core::PlayMode;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Channels {
        state_tx: watch::Sender<LinkState>,
        game_tx: watch::Sender<Option<GameState>>,
        action_rx: mpsc::UnboundedReceiver<Action>,
        cancel: CancellationToken,
        task: tokio::task::JoinHandle<()>,
    }

    fn spawn_bridge(initial: LinkState) -> Channels {
        let (state_tx, state_rx) = watch::channel(initial);
        let (game_tx, game_rx) = watch::channel(None);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_link_bridge(state_rx, game_rx, action_tx, cancel.clone()));
        Channels {
            state_tx,
            game_tx,
            action_rx,
            cancel,
            task,
        }
    }

    #[tokio::test]
    async fn forwards_each_distinct_state() {
        let mut bridge = spawn_bridge(LinkState::Disconnected);

        assert_eq!(
            bridge.action_rx.recv().await.unwrap(),
            Action::Connection(ConnectionStatus::Disconnected)
        );

        bridge.state_tx.send_replace(LinkState::Connected);
        assert_eq!(
            bridge.action_rx.recv().await.unwrap(),
            Action::Connection(ConnectionStatus::Connected)
        );

        bridge.cancel.cancel();
        bridge.task.await.unwrap();
    }

    #[tokio::test]
    async fn forwards_decoded_game_state_as_play_state() {
        let mut bridge = spawn_bridge(LinkState::Connected);
        bridge.action_rx.recv().await.unwrap();

        let mut game = GameState::default();
        game.apply_frame(b"((play_modes BeforeKickOff KickOff_Right)(play_mode 1)(time 4))");
        bridge.game_tx.send_replace(Some(game));

        let Action::PlayState(state) = bridge.action_rx.recv().await.unwrap() else {
            panic!("expected a play state");
        };
        assert_eq!(state.play_mode, PlayMode::KickOffRight);
        assert!(state.has_play_modes());

        // Clearing on disconnect forwards nothing.
        bridge.game_tx.send_replace(None);
        bridge.state_tx.send_replace(LinkState::Disconnected);
        assert_eq!(
            bridge.action_rx.recv().await.unwrap(),
            Action::Connection(ConnectionStatus::Disconnected)
        );

        bridge.cancel.cancel();
        bridge.task.await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_link_goes_away() {
        let Channels {
            state_tx,
            game_tx,
            mut action_rx,
            task,
            ..
        } = spawn_bridge(LinkState::Connecting);

        action_rx.recv().await.unwrap();
        drop(game_tx);
        drop(state_tx);
        task.await.unwrap();
        assert!(action_rx.recv().await.is_none());
    }
}

//! Adapter runtime integration.
//!
//! The game loop owns the single [`GameState`]. The TCP server hands it
//! commands over a bounded channel and receives serialized lines back over
//! an unbounded one.

use std::net::SocketAddr;

use arrayvec::ArrayVec;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::core::{ActionResult, GameState};
use crate::protocol::{create_ack, MAX_ACTIONS_PER_COMMAND};
use crate::server::{build_observation, run_server, ServerConfig};
use crate::types::GameAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    /// Sender's `seq`, echoed in the ack.
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// Apply in order, then ack and broadcast one observation.
    Actions(ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>),
    /// Send the current observation to this client only.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// Delivered to every handshaken client that streams observations.
    Broadcast { line: String },
}

fn to_line<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to serialize outbound message");
            None
        }
    }
}

/// Drive `game` from inbound commands until the command channel closes.
///
/// Returns the final game so callers (and tests) can inspect it.
pub async fn run_game_loop(
    mut game: GameState,
    mut cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
) -> GameState {
    let mut observation_seq: u64 = 0;

    while let Some(inbound) = cmd_rx.recv().await {
        match inbound.payload {
            InboundPayload::SnapshotRequest => {
                observation_seq += 1;
                let obs = build_observation(&game, observation_seq);
                if let Some(line) = to_line(&obs) {
                    let _ = out_tx.send(OutboundMessage::ToClient {
                        client_id: inbound.client_id,
                        line,
                    });
                }
            }
            InboundPayload::Actions(actions) => {
                for action in actions {
                    let status_before = game.status();
                    let result = game.apply_action(action);
                    match result {
                        ActionResult::Restarted => {
                            info!(episode_id = game.episode_id(), seed = game.seed(), "new episode");
                        }
                        ActionResult::Rejected => {
                            debug!(?action, status = game.status().as_str(), "move refused in terminal state");
                        }
                        ActionResult::Moved { .. } => {
                            let status = game.status();
                            if status != status_before && status.is_terminal() {
                                info!(
                                    episode_id = game.episode_id(),
                                    status = status.as_str(),
                                    score = game.score(),
                                    max_tile = game.max_tile(),
                                    moves = game.move_count(),
                                    "episode finished"
                                );
                            }
                        }
                    }
                }

                if let Some(line) = to_line(&create_ack(inbound.seq)) {
                    let _ = out_tx.send(OutboundMessage::ToClient {
                        client_id: inbound.client_id,
                        line,
                    });
                }

                observation_seq += 1;
                let obs = build_observation(&game, observation_seq);
                if let Some(line) = to_line(&obs) {
                    let _ = out_tx.send(OutboundMessage::Broadcast { line });
                }
            }
        }
    }

    game
}

/// Run the server and a game loop seeded from `config.seed`.
///
/// `ready_tx` receives the bound address once the listener is up.
pub async fn serve(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let max_pending = config.max_pending_commands.max(1);
    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

    let game = GameState::new(config.seed);
    info!(seed = config.seed, max_pending, "starting game loop");
    let game_loop = tokio::spawn(run_game_loop(game, cmd_rx, out_tx));

    let result = run_server(config, cmd_tx, out_rx, ready_tx).await;
    game_loop.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn actions(list: &[GameAction]) -> InboundPayload {
        InboundPayload::Actions(list.iter().copied().collect())
    }

    #[tokio::test]
    async fn test_commands_ack_then_broadcast() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_game_loop(GameState::new(3), cmd_rx, out_tx));

        let dir = crate::core::valid_moves(GameState::new(3).board())[0];
        cmd_tx
            .send(InboundCommand {
                client_id: 1,
                seq: 5,
                payload: actions(&[GameAction::Move(dir)]),
            })
            .await
            .unwrap();

        match out_rx.recv().await.unwrap() {
            OutboundMessage::ToClient { client_id, line } => {
                assert_eq!(client_id, 1);
                let v: serde_json::Value = serde_json::from_str(&line).unwrap();
                assert_eq!(v["type"], "ack");
                assert_eq!(v["seq"], 5);
            }
            other => panic!("expected ack, got {:?}", other),
        }
        match out_rx.recv().await.unwrap() {
            OutboundMessage::Broadcast { line } => {
                let v: serde_json::Value = serde_json::from_str(&line).unwrap();
                assert_eq!(v["type"], "observation");
                assert_eq!(v["move_count"], 1);
                assert_eq!(v["last_move"]["changed"], true);
            }
            other => panic!("expected observation, got {:?}", other),
        }

        drop(cmd_tx);
        let game = handle.await.unwrap();
        assert_eq!(game.move_count(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_goes_to_requester_only() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_game_loop(GameState::new(3), cmd_rx, out_tx));

        cmd_tx
            .send(InboundCommand {
                client_id: 9,
                seq: 1,
                payload: InboundPayload::SnapshotRequest,
            })
            .await
            .unwrap();

        match out_rx.recv().await.unwrap() {
            OutboundMessage::ToClient { client_id, line } => {
                assert_eq!(client_id, 9);
                let v: serde_json::Value = serde_json::from_str(&line).unwrap();
                assert_eq!(v["type"], "observation");
                assert_eq!(v["status"], "playing");
                assert!(v.get("last_move").is_none());
            }
            other => panic!("expected snapshot, got {:?}", other),
        }

        drop(cmd_tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_restart_bumps_episode() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (out_tx, _out_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_game_loop(GameState::new(3), cmd_rx, out_tx));

        cmd_tx
            .send(InboundCommand {
                client_id: 1,
                seq: 2,
                payload: actions(&[GameAction::Move(Direction::Left), GameAction::Restart]),
            })
            .await
            .unwrap();
        drop(cmd_tx);

        let game = handle.await.unwrap();
        assert_eq!(game.episode_id(), 1);
        assert_eq!(game.move_count(), 0);
    }
}

//! Signalling protocol state for one WebSocket connection.
//!
//! [`SignalSession`] turns inbound frames into outbound frames and knows
//! whether join codes should be rotating. It never touches the socket, so
//! the protocol is testable without one. [`run_session`] pumps it over any
//! frame stream and sink; [`run_socket`] feeds it an upgraded socket.

use std::fmt;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{Instant, MissedTickBehavior};

use ips_core::{JoinCode, RoomId};

use crate::schema::signal::{ClientMessage, ServerMessage};
use crate::state::AppState;

type CodeGenerator = Box<dyn FnMut() -> JoinCode + Send>;

/// Per-connection protocol state.
pub struct SignalSession {
    state: AppState,
    active_room: Option<RoomId>,
    generate: CodeGenerator,
}

impl SignalSession {
    pub fn new(state: AppState) -> Self {
        Self::with_code_generator(state, || JoinCode::generate(&mut rand::thread_rng()))
    }

    /// Session drawing candidate join codes from `generate`.
    pub fn with_code_generator<F>(state: AppState, generate: F) -> Self
    where
        F: FnMut() -> JoinCode + Send + 'static,
    {
        SignalSession {
            state,
            active_room: None,
            generate: Box::new(generate),
        }
    }

    /// Room whose join codes this connection is rotating, if any.
    pub fn active_room(&self) -> Option<RoomId> {
        self.active_room
    }

    /// Interval between join codes.
    pub fn rotation_period(&self) -> Duration {
        self.state.join_codes.ttl()
    }

    /// Handles one text frame.
    pub fn handle_text(&mut self, text: &str) -> Vec<ServerMessage> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(msg) => self.handle(msg),
            Err(err) => {
                tracing::debug!("rejected signal frame: {}", err);
                vec![ServerMessage::error(format!("invalid message: {}", err))]
            }
        }
    }

    /// Handles one parsed message.
    ///
    /// `create` answers with `joined` followed by the first join code;
    /// `destroy` always answers `destroyed`, whether or not the user was in
    /// the room.
    pub fn handle(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        match msg {
            ClientMessage::Create { room_id, user_id } => {
                self.state.rooms.create_or_join(room_id, user_id);
                self.active_room = Some(room_id);
                tracing::info!(room_id = %room_id, user_id = %user_id, "signal client joined");

                let mut replies = vec![ServerMessage::Joined { room_id, user_id }];
                replies.extend(self.next_join_code());
                replies
            }
            ClientMessage::Destroy { room_id, user_id } => {
                if let Err(err) = self.state.rooms.leave(&room_id, &user_id) {
                    tracing::debug!("destroy ignored: {}", err);
                }
                if self.active_room == Some(room_id) {
                    self.active_room = None;
                }
                tracing::info!(room_id = %room_id, user_id = %user_id, "signal client left");
                vec![ServerMessage::Destroyed { room_id, user_id }]
            }
        }
    }

    /// Issues the next join code for the active room.
    ///
    /// Returns `None` when no room is active.
    pub fn next_join_code(&mut self) -> Option<ServerMessage> {
        let room_id = self.active_room?;
        let msg = match self.state.join_codes.issue_with(room_id, &mut self.generate) {
            Ok(issued) => ServerMessage::JoinCode {
                join_code: issued.join_code,
                ttl: issued.ttl,
            },
            Err(_) => ServerMessage::error("Failed to generate unique join code"),
        };
        Some(msg)
    }
}

/// Drives a session over an upgraded socket until the peer goes away.
pub async fn run_socket(socket: WebSocket, state: AppState) {
    let (sender, receiver) = socket.split();
    run_session(receiver, sender, SignalSession::new(state)).await;
}

/// Pumps frames between a peer and `session`.
///
/// Every `create` restarts the rotation ticker, so the next join code
/// follows one full period after the one sent in reply. Ends when the
/// inbound stream closes or fails, or a send fails.
pub async fn run_session<R, W, E>(mut receiver: R, mut sender: W, mut session: SignalSession)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
    W: Sink<Message> + Unpin,
    W::Error: fmt::Display,
{
    let period = session.rotation_period();
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let replies = session.handle_text(text.as_str());
                        let created = replies
                            .iter()
                            .any(|msg| matches!(msg, ServerMessage::Joined { .. }));
                        if created {
                            ticker.reset();
                        }
                        if let Err(err) = send_all(&mut sender, replies).await {
                            tracing::debug!("signal send failed: {}", err);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!("signal socket error: {}", err);
                        break;
                    }
                }
            }
            _ = ticker.tick(), if session.active_room().is_some() => {
                if let Some(msg) = session.next_join_code() {
                    if let Err(err) = send_all(&mut sender, vec![msg]).await {
                        tracing::debug!("signal send failed: {}", err);
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("signal client disconnected");
}

async fn send_all<S>(sender: &mut S, messages: Vec<ServerMessage>) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    for msg in messages {
        let text = match serde_json::to_string(&msg) {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("failed to encode signal frame: {}", err);
                continue;
            }
        };
        sender.send(Message::Text(text.into())).await?;
    }
    Ok(())
}

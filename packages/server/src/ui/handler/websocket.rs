//! WebSocket connection handlers.
//!
//! Connection lifecycle:
//!
//! 1. HTTP upgrade on `/ws/groups/{group_id}`
//! 2. The client sends an identity handshake (`{"user_id", "user_name"}`)
//!    as its first text frame
//! 3. Membership is verified and the participant joins the session room
//! 4. Frames flow in both directions until either side closes
//! 5. The participant leaves the room, whatever the disconnect path was

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use juku_shared::time::{get_utc_timestamp, timestamp_to_rfc3339};

use crate::{
    domain::{DisplayName, GroupId, ParticipantId, StatusPatch, UserId},
    infrastructure::dto::websocket::{
        ClientFrame, ErrorFrame, HandRaiseUpdateFrame, HandshakeFrame, MessageType,
        SignalForwardFrame,
    },
    ui::state::AppState,
    usecase::JoinError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> GroupId (Domain Model)
    let group_id = match GroupId::new(group_id.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid group_id format: '{}'", group_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // The identity arrives over the socket itself, so the upgrade happens
    // before any membership check.
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, group_id)))
}

/// Waits for the first text frame and parses it as the identity handshake.
///
/// Returns `None` if the connection closes, errors, or sends something that
/// is not valid JSON before identifying itself.
async fn read_handshake(
    receiver: &mut futures_util::stream::SplitStream<WebSocket>,
) -> Option<HandshakeFrame> {
    loop {
        match receiver.next().await? {
            Ok(Message::Text(text)) => {
                return serde_json::from_str::<HandshakeFrame>(&text).ok();
            }
            Ok(Message::Close(_)) => return None,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                continue;
            }
            Ok(_) => return None,
            Err(e) => {
                tracing::error!("WebSocket error during handshake: {}", e);
                return None;
            }
        }
    }
}

/// Sends an error frame for a rejected join, then closes the socket.
///
/// The frame messages are part of the client contract; duplicate participant
/// IDs are an internal anomaly and close without a frame.
async fn reject(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    group_id: &GroupId,
    error: JoinError,
) {
    let message = match &error {
        JoinError::GroupNotFound(_) => Some("Study group not found"),
        JoinError::NotAMember(_) => Some("You are not a member of this study group"),
        JoinError::MembershipUnavailable(_) => Some("Failed to verify group membership"),
        JoinError::DuplicateConnection(_) => None,
    };

    match &error {
        JoinError::DuplicateConnection(id) => {
            tracing::error!(
                "Participant ID collision in group '{}': {}",
                group_id.as_str(),
                id
            );
        }
        other => {
            tracing::warn!("Join rejected for group '{}': {}", group_id.as_str(), other);
        }
    }

    if let Some(message) = message {
        let frame = ErrorFrame {
            r#type: MessageType::Error,
            message: message.to_string(),
        };
        let frame_json = serde_json::to_string(&frame).unwrap();
        if let Err(e) = sender.send(Message::Text(frame_json.into())).await {
            tracing::warn!("Failed to send error frame: {}", e);
        }
    }
    let _ = sender.close().await;
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: frames enqueued by the registry
/// (on behalf of any participant in the room) are sent to this client's
/// WebSocket connection in enqueue order.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this client
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            // Send the frame to this client
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Dispatches one parsed client frame to its usecase.
async fn handle_frame(
    state: &AppState,
    group_id: &GroupId,
    participant_id: ParticipantId,
    user_id: &UserId,
    user_name: &DisplayName,
    frame: ClientFrame,
) {
    match frame {
        ClientFrame::StatusUpdate {
            muted,
            camera_off,
            is_screen_sharing,
        } => {
            let patch = StatusPatch {
                muted,
                camera_off,
                screen_sharing: is_screen_sharing,
            };
            if let Err(e) = state
                .update_status_usecase
                .execute(group_id, &participant_id, patch)
                .await
            {
                tracing::warn!("Status update from '{}' failed: {}", participant_id, e);
            }
        }
        ClientFrame::ChatMessage { message } => {
            if let Err(e) = state
                .send_chat_usecase
                .execute(group_id, user_id.clone(), user_name.clone(), message)
                .await
            {
                tracing::warn!("Chat from '{}' failed: {}", participant_id, e);
            }
        }
        ClientFrame::WebrtcOffer {
            target_participant_id,
            data,
        } => {
            relay_signal(
                state,
                group_id,
                participant_id,
                MessageType::WebrtcOffer,
                &target_participant_id,
                data,
            )
            .await;
        }
        ClientFrame::WebrtcAnswer {
            target_participant_id,
            data,
        } => {
            relay_signal(
                state,
                group_id,
                participant_id,
                MessageType::WebrtcAnswer,
                &target_participant_id,
                data,
            )
            .await;
        }
        ClientFrame::WebrtcIceCandidate {
            target_participant_id,
            data,
        } => {
            relay_signal(
                state,
                group_id,
                participant_id,
                MessageType::WebrtcIceCandidate,
                &target_participant_id,
                data,
            )
            .await;
        }
        ClientFrame::HandRaise { hand_raised } => {
            let update = HandRaiseUpdateFrame {
                r#type: MessageType::HandRaiseUpdate,
                participant_id: participant_id.to_string(),
                participant_name: user_name.as_str().to_string(),
                hand_raised,
                timestamp: timestamp_to_rfc3339(get_utc_timestamp()),
            };
            let update_json = serde_json::to_string(&update).unwrap();
            if let Err(e) = state
                .raise_hand_usecase
                .execute(group_id, update_json)
                .await
            {
                tracing::warn!("Hand raise from '{}' failed: {}", participant_id, e);
            }
        }
        ClientFrame::Unknown => {
            tracing::warn!("Unknown frame type from '{}', ignoring", participant_id);
        }
    }
}

/// Stamps a signaling payload with its sender and relays it to the target.
///
/// A missing or invalid target drops the frame without notifying the sender
/// (the target may have disconnected a moment earlier).
async fn relay_signal(
    state: &AppState,
    group_id: &GroupId,
    from: ParticipantId,
    frame_type: MessageType,
    target_raw: &str,
    data: serde_json::Value,
) {
    let forward = SignalForwardFrame {
        r#type: frame_type,
        from_participant_id: from.to_string(),
        data,
    };
    let forward_json = serde_json::to_string(&forward).unwrap();

    state
        .relay_signal_usecase
        .execute(group_id, target_raw, forward_json)
        .await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, group_id: GroupId) {
    let (mut sender, mut receiver) = socket.split();

    // Wait for the identity handshake before touching any session state
    let Some(handshake) = read_handshake(&mut receiver).await else {
        tracing::warn!(
            "Connection to group '{}' closed before a valid handshake",
            group_id.as_str()
        );
        let _ = sender.close().await;
        return;
    };

    // Convert String -> Domain Models
    let (user_id, user_name) = match (
        UserId::new(handshake.user_id),
        DisplayName::new(handshake.user_name),
    ) {
        (Ok(user_id), Ok(user_name)) => (user_id, user_name),
        _ => {
            tracing::warn!(
                "Blank identity in handshake for group '{}'",
                group_id.as_str()
            );
            let _ = sender.close().await;
            return;
        }
    };

    // Create a channel for this connection to receive frames
    let (tx, rx) = mpsc::unbounded_channel();

    // Use JoinSessionUseCase to verify membership and register the participant.
    // The initial frames (connection_established, participants_update and the
    // chat history) are enqueued into tx before this returns.
    let joined = match state
        .join_session_usecase
        .execute(group_id.clone(), user_id.clone(), user_name.clone(), tx)
        .await
    {
        Ok(joined) => joined,
        Err(e) => {
            reject(&mut sender, &group_id, e).await;
            return;
        }
    };
    let participant_id = joined.participant_id;

    // Spawn a task to push enqueued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to receive frames from this client
    let state_clone = state.clone();
    let group_id_clone = group_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let frame = match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(
                                "Failed to parse frame from '{}': {}",
                                participant_id,
                                e
                            );
                            continue;
                        }
                    };

                    handle_frame(
                        &state_clone,
                        &group_id_clone,
                        participant_id,
                        &user_id,
                        &user_name,
                        frame,
                    )
                    .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Participant '{}' requested close", participant_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use LeaveSessionUseCase to clean up, whatever the disconnect path was.
    // Teardown of an emptied room and the presence broadcast to the
    // remaining participants happen inside.
    state
        .leave_session_usecase
        .execute(&group_id, &participant_id)
        .await;
}

//! WebSocket message DTOs.
//!
//! Inbound frames are modeled as an internally tagged enum keyed by the
//! `type` field. Outbound frames are one struct per frame type, each
//! carrying its `type` tag explicitly.

use serde::{Deserialize, Serialize};

/// First frame sent by the client after connecting.
///
/// Both fields are required to be non-blank; a blank identity closes the
/// connection without an error frame.
#[derive(Debug, Clone, Deserialize)]
pub struct HandshakeFrame {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
}

/// Inbound frames after the handshake, dispatched by the `type` field.
///
/// Unrecognized types fall into `Unknown` and are logged and ignored
/// without dropping the connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    #[serde(rename = "status_update")]
    StatusUpdate {
        muted: Option<bool>,
        camera_off: Option<bool>,
        is_screen_sharing: Option<bool>,
    },
    #[serde(rename = "chat_message")]
    ChatMessage {
        #[serde(default)]
        message: String,
    },
    #[serde(rename = "webrtc_offer")]
    WebrtcOffer {
        #[serde(default)]
        target_participant_id: String,
        #[serde(default)]
        data: serde_json::Value,
    },
    #[serde(rename = "webrtc_answer")]
    WebrtcAnswer {
        #[serde(default)]
        target_participant_id: String,
        #[serde(default)]
        data: serde_json::Value,
    },
    #[serde(rename = "webrtc_ice_candidate")]
    WebrtcIceCandidate {
        #[serde(default)]
        target_participant_id: String,
        #[serde(default)]
        data: serde_json::Value,
    },
    #[serde(rename = "hand_raise")]
    HandRaise {
        #[serde(default)]
        hand_raised: bool,
    },
    #[serde(other)]
    Unknown,
}

/// Outbound frame type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    ConnectionEstablished,
    ParticipantsUpdate,
    ChatHistory,
    ChatMessage,
    HandRaiseUpdate,
    WebrtcOffer,
    WebrtcAnswer,
    WebrtcIceCandidate,
    Error,
}

/// Participant as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub muted: bool,
    pub camera_off: bool,
    pub is_screen_sharing: bool,
    pub joined_at: String,
}

/// Room metadata as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfoDto {
    pub group_id: String,
    pub title: String,
    pub subject: String,
    pub session_started_at: String,
}

/// Chat message as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub timestamp: String,
}

/// Sent once to the joining client, before any other frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEstablishedFrame {
    pub r#type: MessageType,
    pub participant_id: String,
    pub room_info: RoomInfoDto,
}

/// Full participant list, sent to every client on membership or status changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsUpdateFrame {
    pub r#type: MessageType,
    pub participants: Vec<ParticipantDto>,
    pub room_info: RoomInfoDto,
}

/// Chat history replay, sent once to a joining client when history exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryFrame {
    pub r#type: MessageType,
    pub messages: Vec<ChatMessageDto>,
}

/// A single relayed chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageFrame {
    pub r#type: MessageType,
    pub message: ChatMessageDto,
}

/// Hand raise event broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRaiseUpdateFrame {
    pub r#type: MessageType,
    pub participant_id: String,
    pub participant_name: String,
    pub hand_raised: bool,
    pub timestamp: String,
}

/// WebRTC signaling frame forwarded to its target participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalForwardFrame {
    pub r#type: MessageType,
    pub from_participant_id: String,
    pub data: serde_json::Value,
}

/// Error notification sent before closing a rejected connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub r#type: MessageType,
    pub message: String,
}

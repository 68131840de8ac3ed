//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of one live session, for the session list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummaryDto {
    pub group_id: String,
    pub title: String,
    pub subject: String,
    pub participant_count: usize,
    pub chat_message_count: usize,
    pub session_started_at: String,
}

/// Full state of one live session, for the session detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub group_id: String,
    pub title: String,
    pub subject: String,
    pub session_started_at: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub chat_message_count: usize,
}

/// Participant entry inside a session detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub participant_id: String,
    pub user_id: String,
    pub name: String,
    pub muted: bool,
    pub camera_off: bool,
    pub is_screen_sharing: bool,
    pub joined_at: String,
}

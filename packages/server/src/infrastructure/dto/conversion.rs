//! Conversion logic between domain entities and wire DTOs.
//!
//! 変換は一方向 (ドメイン → DTO) のみ。受信フレームはハンドラ側で
//! 値オブジェクトに検証しながら変換するため、逆方向の From は持たない。

use juku_shared::time::timestamp_to_rfc3339;

use crate::domain::entity;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&entity::Participant> for dto::ParticipantDto {
    fn from(model: &entity::Participant) -> Self {
        Self {
            id: model.id.to_string(),
            user_id: model.user_id.as_str().to_string(),
            name: model.name.as_str().to_string(),
            muted: model.muted,
            camera_off: model.camera_off,
            is_screen_sharing: model.screen_sharing,
            joined_at: timestamp_to_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<&entity::RoomInfo> for dto::RoomInfoDto {
    fn from(model: &entity::RoomInfo) -> Self {
        Self {
            group_id: model.group_id.as_str().to_string(),
            title: model.title.clone(),
            subject: model.subject.clone(),
            session_started_at: timestamp_to_rfc3339(model.session_started_at.value()),
        }
    }
}

impl From<&entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: &entity::ChatMessage) -> Self {
        Self {
            id: model.id.to_string(),
            sender_id: model.sender_id.as_str().to_string(),
            sender_name: model.sender_name.as_str().to_string(),
            message: model.text.as_str().to_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

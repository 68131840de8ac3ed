//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ParticipantDetailDto, SessionDetailDto, SessionSummaryDto},
    ui::state::AppState,
};
use juku_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live sessions
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummaryDto>> {
    let rooms = state.get_sessions_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<SessionSummaryDto> = rooms
        .into_iter()
        .map(|room| SessionSummaryDto {
            group_id: room.info.group_id.as_str().to_string(),
            title: room.info.title.clone(),
            subject: room.info.subject.clone(),
            participant_count: room.participant_count(),
            chat_message_count: room.chat_history.len(),
            session_started_at: timestamp_to_rfc3339(room.info.session_started_at.value()),
        })
        .collect();

    Json(summaries)
}

/// Get live session detail by group ID
pub async fn get_session_detail(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<SessionDetailDto>, StatusCode> {
    match state.get_session_detail_usecase.execute(group_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let detail = SessionDetailDto {
                group_id: room.info.group_id.as_str().to_string(),
                title: room.info.title.clone(),
                subject: room.info.subject.clone(),
                session_started_at: timestamp_to_rfc3339(room.info.session_started_at.value()),
                participants: room
                    .participants
                    .iter()
                    .map(|p| ParticipantDetailDto {
                        participant_id: p.id.to_string(),
                        user_id: p.user_id.as_str().to_string(),
                        name: p.name.as_str().to_string(),
                        muted: p.muted,
                        camera_off: p.camera_off,
                        is_screen_sharing: p.screen_sharing,
                        joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                    })
                    .collect(),
                chat_message_count: room.chat_history.len(),
            };
            Ok(Json(detail))
        }
        Err(crate::usecase::GetSessionDetailError::SessionNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

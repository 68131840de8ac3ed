//! Server state shared across handlers.

use std::sync::Arc;

use crate::usecase::{
    GetSessionDetailUseCase, GetSessionsUseCase, JoinSessionUseCase, LeaveSessionUseCase,
    RaiseHandUseCase, RelaySignalUseCase, SendChatUseCase, UpdateStatusUseCase,
};

/// Shared application state
pub struct AppState {
    /// JoinSessionUseCase（セッション参加のユースケース）
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    /// LeaveSessionUseCase（セッション退出のユースケース）
    pub leave_session_usecase: Arc<LeaveSessionUseCase>,
    /// UpdateStatusUseCase（ステータス更新のユースケース）
    pub update_status_usecase: Arc<UpdateStatusUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// RaiseHandUseCase（挙手通知のユースケース）
    pub raise_hand_usecase: Arc<RaiseHandUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    /// GetSessionDetailUseCase（セッション詳細取得のユースケース）
    pub get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}

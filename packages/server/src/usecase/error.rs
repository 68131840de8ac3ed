//! UseCase 層のエラー定義

use thiserror::Error;

/// セッション参加のエラー
///
/// `GroupNotFound` / `NotAMember` / `MembershipUnavailable` は UI 層で
/// `error` フレームに変換されてからクローズされる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("study group '{0}' not found")]
    GroupNotFound(String),

    #[error("user '{0}' is not a member of the study group")]
    NotAMember(String),

    #[error("failed to verify group membership: {0}")]
    MembershipUnavailable(String),

    #[error("participant '{0}' is already connected")]
    DuplicateConnection(String),
}

/// ステータス更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusUpdateError {
    #[error("session room '{0}' not found")]
    SessionNotFound(String),

    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),
}

/// チャット送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendChatError {
    #[error("session room '{0}' not found")]
    SessionNotFound(String),
}

/// 挙手通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandRaiseError {
    #[error("session room '{0}' not found")]
    SessionNotFound(String),
}

/// セッション詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetSessionDetailError {
    #[error("session not found")]
    SessionNotFound,
}

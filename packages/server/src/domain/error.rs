//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("group id must not be empty")]
    EmptyGroupId,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("chat text is empty after trimming")]
    EmptyChatText,

    #[error("invalid participant id: '{0}'")]
    InvalidParticipantId(String),
}

/// SessionRoom 集約の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("participant '{0}' is already in the room")]
    DuplicateParticipant(String),

    #[error("participant '{0}' not found in the room")]
    ParticipantNotFound(String),
}

/// RoomRegistry の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("session room '{0}' not found")]
    RoomNotFound(String),

    #[error("participant '{0}' is already registered")]
    DuplicateParticipant(String),

    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),
}

/// GroupStore の参照エラー
///
/// 参加許可の判定中にこのエラーが出た場合、UseCase 層は安全側に倒して
/// 接続を拒否する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupStoreError {
    #[error("group store unavailable: {0}")]
    Unavailable(String),
}

//! SessionRoom 集約
//!
//! 1 つのスタディグループに対応する部屋の状態。接続中の参加者リストと
//! メタデータ（タイトル・科目・チャット履歴）を 1 つの集約として持つ。
//!
//! ## 不変条件
//!
//! - 参加者 ID は部屋の中で一意
//! - チャット履歴は追記のみ（並び替え・削除はしない）
//! - 参加者リストは参加順を保持する（スナップショットの並びを決定的にするため）

use super::entity::{ChatMessage, Participant, RoomInfo, StatusPatch};
use super::error::DomainError;
use super::value_object::ParticipantId;

/// セッション中の部屋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRoom {
    /// 部屋のメタデータ
    pub info: RoomInfo,
    /// 接続中の参加者（参加順）
    pub participants: Vec<Participant>,
    /// チャット履歴（追記のみ）
    pub chat_history: Vec<ChatMessage>,
}

impl SessionRoom {
    /// 新しい SessionRoom を作成
    pub fn new(info: RoomInfo) -> Self {
        Self {
            info,
            participants: Vec::new(),
            chat_history: Vec::new(),
        }
    }

    /// 参加者を追加
    ///
    /// 同じ ParticipantId が既に存在する場合はエラー。
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), DomainError> {
        if self.contains(&participant.id) {
            return Err(DomainError::DuplicateParticipant(participant.id.to_string()));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// 参加者を削除（存在しなければ None を返すだけで何もしない）
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| &p.id == id)?;
        Some(self.participants.remove(index))
    }

    /// 参加者のステータスを部分更新
    pub fn update_status(
        &mut self,
        id: &ParticipantId,
        patch: StatusPatch,
    ) -> Result<(), DomainError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::ParticipantNotFound(id.to_string()))?;
        participant.apply_status(patch);
        Ok(())
    }

    /// チャットメッセージを履歴に追記
    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_history.push(message);
    }

    /// 指定した参加者が部屋にいるか
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.iter().any(|p| &p.id == id)
    }

    /// 部屋が空かどうか
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// 参加者数
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

//! エンティティ定義
//!
//! セッションに参加している参加者、チャットメッセージ、部屋のメタデータ。

use super::value_object::{ChatText, DisplayName, GroupId, MessageId, ParticipantId, Timestamp, UserId};

/// ステータスの部分更新
///
/// `None` のフィールドは「変更しない」を意味する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusPatch {
    pub muted: Option<bool>,
    pub camera_off: Option<bool>,
    pub screen_sharing: Option<bool>,
}

/// セッション参加者
///
/// 1 接続 = 1 参加者。同じユーザーが複数接続すればそれぞれ別の
/// Participant になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// 接続ごとに発行される ID
    pub id: ParticipantId,
    /// プラットフォーム上のユーザー ID
    pub user_id: UserId,
    /// 表示名
    pub name: DisplayName,
    /// ミュート状態
    pub muted: bool,
    /// カメラオフ状態
    pub camera_off: bool,
    /// 画面共有中かどうか
    pub screen_sharing: bool,
    /// 参加時刻
    pub joined_at: Timestamp,
}

impl Participant {
    /// 新しい Participant を作成
    ///
    /// 初期状態はミュート・カメラオフ・画面共有なし。
    pub fn new(id: ParticipantId, user_id: UserId, name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            user_id,
            name,
            muted: true,
            camera_off: true,
            screen_sharing: false,
            joined_at,
        }
    }

    /// ステータスの部分更新を適用（指定されなかったフィールドは維持）
    pub fn apply_status(&mut self, patch: StatusPatch) {
        if let Some(muted) = patch.muted {
            self.muted = muted;
        }
        if let Some(camera_off) = patch.camera_off {
            self.camera_off = camera_off;
        }
        if let Some(screen_sharing) = patch.screen_sharing {
            self.screen_sharing = screen_sharing;
        }
    }
}

/// チャットメッセージ（不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    pub sender_name: DisplayName,
    pub text: ChatText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 新しい ChatMessage を作成（ID はここで発行される）
    pub fn new(sender_id: UserId, sender_name: DisplayName, text: ChatText, timestamp: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id,
            sender_name,
            text,
            timestamp,
        }
    }
}

/// 部屋のメタデータ
///
/// 最初の参加時に作成され、最後の参加者が退出すると部屋ごと破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub group_id: GroupId,
    pub title: String,
    pub subject: String,
    pub session_started_at: Timestamp,
}

impl RoomInfo {
    /// 新しい RoomInfo を作成
    pub fn new(group_id: GroupId, title: String, subject: String, session_started_at: Timestamp) -> Self {
        Self {
            group_id,
            title,
            subject,
            session_started_at,
        }
    }
}

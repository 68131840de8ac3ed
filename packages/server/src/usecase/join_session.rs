//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - 参加許可の判定（グループ存在確認、メンバーシップ確認）と部屋への登録
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：メンバー以外の接続を拒否する
//! - グループ参照に失敗した場合に安全側（拒否）へ倒れることを保証
//! - Registry への登録と参加時フレームの配信が行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーによる新規参加
//! - 異常系：存在しないグループ、メンバー外ユーザー、グループ参照失敗
//! - エッジケース：ParticipantId の衝突（Registry が重複を報告した場合）

use std::sync::Arc;

use crate::domain::{
    DisplayName, GroupId, GroupStore, Participant, ParticipantId, PusherChannel, RegistryError,
    RoomInfo, RoomRegistry, Timestamp, UserId,
};

use super::error::JoinError;

/// 参加処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedSession {
    /// この接続に発行された参加者 ID
    pub participant_id: ParticipantId,
}

/// セッション参加のユースケース
///
/// 接続ライフサイクルの入口。グループのメンバーであることを確認してから
/// 部屋へ登録する。部屋が存在しなければこのとき作成される。
pub struct JoinSessionUseCase {
    /// GroupStore（グループ永続データへの読み取り抽象化）
    group_store: Arc<dyn GroupStore>,
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(group_store: Arc<dyn GroupStore>, registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            group_store,
            registry,
        }
    }

    /// セッション参加を実行
    ///
    /// # Arguments
    ///
    /// * `group_id` - 参加先のスタディグループ ID（Domain Model）
    /// * `user_id` - ハンドシェイクで申告されたユーザー ID（Domain Model）
    /// * `user_name` - ハンドシェイクで申告された表示名（Domain Model）
    /// * `channel` - この接続へのフレーム送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedSession)` - 参加成功（発行された参加者 ID を返す）
    /// * `Err(JoinError)` - 参加拒否
    pub async fn execute(
        &self,
        group_id: GroupId,
        user_id: UserId,
        user_name: DisplayName,
        channel: PusherChannel,
    ) -> Result<JoinedSession, JoinError> {
        use juku_shared::time::get_utc_timestamp;

        // 1. グループの存在確認（参照に失敗した場合も参加拒否）
        let record = match self.group_store.find_group_by_id(&group_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Err(JoinError::GroupNotFound(group_id.as_str().to_string()));
            }
            Err(e) => {
                tracing::warn!(
                    "Membership check failed for group '{}': {}",
                    group_id.as_str(),
                    e
                );
                return Err(JoinError::MembershipUnavailable(e.to_string()));
            }
        };

        // 2. メンバーシップ確認
        if !record.is_member(&user_id) {
            return Err(JoinError::NotAMember(user_id.as_str().to_string()));
        }

        // 3. Participant を生成（初期状態はミュート・カメラオフ）
        let now = Timestamp::new(get_utc_timestamp());
        let participant = Participant::new(ParticipantId::generate(), user_id, user_name, now);
        let participant_id = participant.id;

        // 4. RoomInfo を構築（部屋が既に存在する場合は Registry 側で既存のものが維持される）
        let info = RoomInfo::new(group_id.clone(), record.title, record.subject, now);

        // 5. Registry へ登録（参加時フレームの配信も同じ部屋ロックの中で行われる）
        let count = self
            .registry
            .join(info, participant, channel)
            .await
            .map_err(|e| match e {
                RegistryError::DuplicateParticipant(id) => JoinError::DuplicateConnection(id),
                other => JoinError::MembershipUnavailable(other.to_string()),
            })?;

        tracing::info!(
            "Participant '{}' joined group '{}' ({} connected)",
            participant_id,
            group_id.as_str(),
            count
        );

        Ok(JoinedSession { participant_id })
    }
}

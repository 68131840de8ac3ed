//! UseCase: ステータス更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateStatusUseCase::execute() メソッド
//! - ミュート・カメラ・画面共有フラグの部分更新
//!
//! ### なぜこのテストが必要か
//! - 指定されなかったフィールドが維持されることを保証
//! - 更新後の participants_update が全参加者に配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：一部フィールドのみの更新
//! - 異常系：存在しない部屋・参加者への更新（切断との競合）

use std::sync::Arc;

use crate::domain::{GroupId, ParticipantId, RegistryError, RoomRegistry, StatusPatch};

use super::error::StatusUpdateError;

/// ステータス更新のユースケース
pub struct UpdateStatusUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl UpdateStatusUseCase {
    /// 新しい UpdateStatusUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// ステータス更新を実行
    ///
    /// # Arguments
    ///
    /// * `group_id` - 対象のスタディグループ ID（Domain Model）
    /// * `participant_id` - 更新する参加者の ID（Domain Model）
    /// * `patch` - 部分更新の内容（`None` のフィールドは変更しない）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 更新成功（participants_update の配信も完了）
    /// * `Err(StatusUpdateError)` - 部屋または参加者が存在しない
    pub async fn execute(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
        patch: StatusPatch,
    ) -> Result<(), StatusUpdateError> {
        // 1. Registry 経由で部分更新を適用（配信も同じ部屋ロックの中で行われる）
        self.registry
            .update_status(group_id, participant_id, patch)
            .await
            .map_err(|e| match e {
                RegistryError::RoomNotFound(id) => StatusUpdateError::SessionNotFound(id),
                _ => StatusUpdateError::ParticipantNotFound(participant_id.to_string()),
            })
    }
}

//! UseCase: 挙手通知処理
//!
//! 挙手は参加者の永続的な状態としては持たず、イベントとして全参加者へ
//! ブロードキャストするだけにする。状態を持つフラグ（ミュートなど）とは
//! 扱いが異なる。

use std::sync::Arc;

use crate::domain::{GroupId, RoomRegistry};

use super::error::HandRaiseError;

/// 挙手通知のユースケース
pub struct RaiseHandUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl RaiseHandUseCase {
    /// 新しい RaiseHandUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 挙手通知を実行
    ///
    /// # Arguments
    ///
    /// * `group_id` - 対象のスタディグループ ID（Domain Model）
    /// * `frame` - 配信する hand_raise_update フレーム（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 全参加者への配信完了
    /// * `Err(HandRaiseError)` - 部屋が存在しない
    pub async fn execute(&self, group_id: &GroupId, frame: String) -> Result<(), HandRaiseError> {
        // 1. 全参加者へブロードキャスト（送信者自身を含む）
        self.registry
            .broadcast(group_id, frame)
            .await
            .map_err(|_| HandRaiseError::SessionNotFound(group_id.as_str().to_string()))
    }
}

//! UseCase: セッション詳細取得処理

use std::sync::Arc;

use crate::domain::{GroupId, RoomRegistry, SessionRoom};

use super::error::GetSessionDetailError;

/// セッション詳細取得のユースケース
pub struct GetSessionDetailUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetSessionDetailUseCase {
    /// 新しい GetSessionDetailUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 指定したグループのセッションのスナップショットを取得
    ///
    /// # Arguments
    ///
    /// * `group_id_raw` - HTTP パスから受け取ったグループ ID（未検証の文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(SessionRoom)` - スナップショット（Domain Model）
    /// * `Err(GetSessionDetailError)` - セッション中の部屋が存在しない
    pub async fn execute(&self, group_id_raw: String) -> Result<SessionRoom, GetSessionDetailError> {
        // 1. GroupId へ変換（不正な ID は「存在しない」と同じ扱い）
        let group_id =
            GroupId::new(group_id_raw).map_err(|_| GetSessionDetailError::SessionNotFound)?;

        // 2. スナップショットを取得
        self.registry
            .snapshot(&group_id)
            .await
            .ok_or(GetSessionDetailError::SessionNotFound)
    }
}

//! UseCase: セッション一覧取得処理
//!
//! HTTP の観測系エンドポイント用。接続中の部屋のスナップショットを返す。

use std::sync::Arc;

use crate::domain::{RoomRegistry, SessionRoom};

/// セッション一覧取得のユースケース
pub struct GetSessionsUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl GetSessionsUseCase {
    /// 新しい GetSessionsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 接続中の全セッションのスナップショットを取得
    ///
    /// # Returns
    ///
    /// グループ ID でソートしたスナップショットのリスト（Domain Model）
    pub async fn execute(&self) -> Vec<SessionRoom> {
        let mut rooms = self.registry.snapshots().await;

        // Sort by group_id for consistent ordering
        rooms.sort_by(|a, b| a.info.group_id.as_str().cmp(b.info.group_id.as_str()));

        rooms
    }
}

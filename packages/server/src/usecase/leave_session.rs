//! UseCase: セッション退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveSessionUseCase::execute() メソッド
//! - 参加者の削除と、最後の参加者退出時の部屋解体
//!
//! ### なぜこのテストが必要か
//! - 切断経路がどうであれ部屋の状態が確実に片付くことを保証
//! - 残った参加者への presence 配信が行われることを確認
//! - 退出が冪等であること（二重実行しても壊れない）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人の部屋からの退出
//! - エッジケース：最後の参加者の退出（部屋の解体）
//! - エッジケース：既に削除済みの参加者の退出（冪等性）

use std::sync::Arc;

use crate::domain::{GroupId, LeaveOutcome, ParticipantId, RoomRegistry};

/// セッション退出のユースケース
///
/// WebSocket の切断経路（正常クローズ・エラー・タスク中断）すべてから
/// 呼ばれる。部屋が空になった場合はメタデータごと破棄される。
pub struct LeaveSessionUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// セッション退出を実行（冪等）
    ///
    /// # Arguments
    ///
    /// * `group_id` - 退出元のスタディグループ ID（Domain Model）
    /// * `participant_id` - 退出する参加者の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// 退出処理の結果（削除されたか・残り人数・部屋が解体されたか）
    pub async fn execute(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
    ) -> LeaveOutcome {
        // 1. Registry から削除（残った参加者への配信と空部屋の解体も Registry 側で行われる）
        let outcome = self.registry.leave(group_id, participant_id).await;

        if outcome.removed {
            tracing::info!(
                "Participant '{}' left group '{}' ({} remaining)",
                participant_id,
                group_id.as_str(),
                outcome.remaining
            );
        } else {
            tracing::debug!(
                "Participant '{}' was already removed from group '{}'",
                participant_id,
                group_id.as_str()
            );
        }

        if outcome.torn_down {
            tracing::info!("Session room '{}' torn down (empty)", group_id.as_str());
        }

        outcome
    }
}

//! UseCase: シグナリング中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySignalUseCase::execute() メソッド
//! - WebRTC フレーム（offer / answer / ICE candidate）の 1 対 1 中継
//!
//! ### なぜこのテストが必要か
//! - 宛先の参加者にのみ届くこと（他の参加者に漏れない）を保証
//! - 宛先不明のフレームが黙って破棄されること（送信者にエラーを返さない）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：実在する宛先への中継
//! - エッジケース：不正な宛先 ID、退出済みの宛先（切断との競合）

use std::sync::Arc;

use crate::domain::{GroupId, ParticipantId, RoomRegistry};

/// 中継処理の結果
///
/// 宛先不明はエラーではなく通常の結果として扱う（切断と常に競合するため）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 宛先に enqueue された
    Delivered,
    /// 宛先が見つからず破棄された（送信者への通知はしない）
    TargetMissing,
}

/// シグナリング中継のユースケース
///
/// ペイロードには手を付けず、宛先の参加者へそのまま転送する。
pub struct RelaySignalUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// シグナリング中継を実行
    ///
    /// # Arguments
    ///
    /// * `group_id` - 対象のスタディグループ ID（Domain Model）
    /// * `target_raw` - クライアントが指定した宛先参加者 ID（未検証の文字列）
    /// * `frame` - 転送するシリアライズ済みフレーム（DTO 層で生成されたもの）
    ///
    /// # Returns
    ///
    /// 中継の結果。どちらの場合も送信者へフレームは返らない。
    pub async fn execute(
        &self,
        group_id: &GroupId,
        target_raw: &str,
        frame: String,
    ) -> RelayOutcome {
        // 1. 宛先 ID を解釈（不正な ID は宛先不明と同じ扱い）
        let target = match ParticipantId::parse(target_raw) {
            Ok(target) => target,
            Err(_) => {
                tracing::debug!("Signal with invalid target id '{}' dropped", target_raw);
                return RelayOutcome::TargetMissing;
            }
        };

        // 2. 宛先にのみ転送
        match self.registry.relay_to(group_id, &target, frame).await {
            Ok(()) => RelayOutcome::Delivered,
            Err(e) => {
                tracing::debug!("Signal to '{}' dropped: {}", target, e);
                RelayOutcome::TargetMissing
            }
        }
    }
}

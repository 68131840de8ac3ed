//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とするセッション部屋の管理インターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 設計ノート
//!
//! 部屋の状態変更とその変更を知らせるブロードキャストは、順序保証のために
//! 同じ部屋ロックの中で行う必要がある。そのため通知チャンネルの管理も
//! この trait の責務に含まれる（変更とスナップショット配信が分離されない）。

use async_trait::async_trait;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::entity::{ChatMessage, Participant, RoomInfo, StatusPatch};
use super::error::RegistryError;
use super::room::SessionRoom;
use super::value_object::{GroupId, ParticipantId};

/// 参加者への送信チャンネル
///
/// シリアライズ済みのフレーム（JSON 文字列）を WebSocket 送信タスクへ渡す。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 退出処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// 参加者が実際に削除されたか（既に削除済みなら false）
    pub removed: bool,
    /// 退出後に残っている参加者数
    pub remaining: usize,
    /// 部屋が空になり解体されたか
    pub torn_down: bool,
}

/// Room Registry trait
///
/// 接続中のセッション部屋（参加者・メタデータ・送信チャンネル）を管理する。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
///
/// ## 配信の契約
///
/// - `join` / `leave` / `update_status` / `append_chat` は、変更後の状態を
///   反映したフレームを同じ部屋の全参加者のチャンネルへ enqueue してから返る
/// - 個々のチャンネルへの送信失敗は記録した上で残りの配信を続ける
///   （呼び出し側へはエラーを返さない）
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// 参加者を部屋に登録する
    ///
    /// 部屋が存在しなければ `info` から新規作成する。既に存在する場合、
    /// `info` は無視され作成時のメタデータ（チャット履歴を含む）が維持される。
    ///
    /// 登録した参加者へは `connection_established` と（履歴があれば）
    /// `chat_history` を、部屋の全参加者へは `participants_update` を配信する。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 登録後の参加者数
    /// * `Err(RegistryError)` - 同じ ParticipantId が登録済みの場合
    async fn join(
        &self,
        info: RoomInfo,
        participant: Participant,
        channel: PusherChannel,
    ) -> Result<usize, RegistryError>;

    /// 参加者を部屋から削除する（冪等）
    ///
    /// 残った参加者へ `participants_update` を配信する。最後の参加者が
    /// 退出した場合は部屋ごと破棄する。
    async fn leave(&self, group_id: &GroupId, participant_id: &ParticipantId) -> LeaveOutcome;

    /// 参加者のステータスを部分更新し、`participants_update` を配信する
    async fn update_status(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
        patch: StatusPatch,
    ) -> Result<(), RegistryError>;

    /// チャットメッセージを履歴に追記し、`chat_message` を全参加者へ配信する
    async fn append_chat(
        &self,
        group_id: &GroupId,
        message: ChatMessage,
    ) -> Result<(), RegistryError>;

    /// シリアライズ済みフレームを特定の参加者にのみ送信する
    async fn relay_to(
        &self,
        group_id: &GroupId,
        target: &ParticipantId,
        frame: String,
    ) -> Result<(), RegistryError>;

    /// シリアライズ済みフレームを部屋の全参加者へ送信する
    async fn broadcast(&self, group_id: &GroupId, frame: String) -> Result<(), RegistryError>;

    /// 部屋のスナップショットを取得（存在しなければ None）
    async fn snapshot(&self, group_id: &GroupId) -> Option<SessionRoom>;

    /// 全部屋のスナップショットを取得
    async fn snapshots(&self) -> Vec<SessionRoom>;
}

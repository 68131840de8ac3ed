//! UseCase: チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - 本文の正規化（trim）、履歴への追記、chat_message の配信
//!
//! ### なぜこのテストが必要か
//! - 空になる本文が黙って破棄されること（エラーにしない）を保証
//! - 履歴が追記順を保つことを確認
//! - 送信者を含む全参加者に配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常のチャット送信
//! - エッジケース：空白のみの本文
//! - 異常系：存在しない部屋への送信（切断との競合）

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ChatText, DisplayName, GroupId, MessageId, RoomRegistry, Timestamp, UserId,
};

use super::error::SendChatError;

/// チャット送信のユースケース
pub struct SendChatUseCase {
    /// Registry（セッション部屋管理の抽象化）
    registry: Arc<dyn RoomRegistry>,
}

impl SendChatUseCase {
    /// 新しい SendChatUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// チャット送信を実行
    ///
    /// # Arguments
    ///
    /// * `group_id` - 送信先のスタディグループ ID（Domain Model）
    /// * `sender_id` - 送信者のユーザー ID（Domain Model）
    /// * `sender_name` - 送信者の表示名（Domain Model）
    /// * `raw_text` - クライアントから受け取った本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Some(MessageId))` - 送信成功
    /// * `Ok(None)` - 本文が空のため破棄（エラーではない）
    /// * `Err(SendChatError)` - 部屋が存在しない
    pub async fn execute(
        &self,
        group_id: &GroupId,
        sender_id: UserId,
        sender_name: DisplayName,
        raw_text: String,
    ) -> Result<Option<MessageId>, SendChatError> {
        use juku_shared::time::get_utc_timestamp;

        // 1. 本文を正規化（trim 後に空なら黙って破棄）
        let text = match ChatText::new(raw_text) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!(
                    "Empty chat message from '{}' ignored",
                    sender_id.as_str()
                );
                return Ok(None);
            }
        };

        // 2. ChatMessage を生成
        let message = ChatMessage::new(
            sender_id,
            sender_name,
            text,
            Timestamp::new(get_utc_timestamp()),
        );
        let message_id = message.id;

        // 3. Registry 経由で履歴に追記（chat_message の配信も同じ部屋ロックの中で行われる）
        self.registry
            .append_chat(group_id, message)
            .await
            .map_err(|_| SendChatError::SessionNotFound(group_id.as_str().to_string()))?;

        Ok(Some(message_id))
    }
}

//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 設計ノート
//!
//! ロックは 2 段構えになっています：
//!
//! ```text
//! rooms: Mutex<HashMap<GroupId, Arc<Mutex<RoomShard>>>>
//!        ^^^^^ 部屋の追加・削除のみを守る外側のロック
//!                              ^^^^^ 部屋ごとの状態を守る内側のロック
//! ```
//!
//! - 外側のロックは Arc を取り出すまでの短時間しか保持しない
//! - 状態変更とフレームの enqueue は内側のロックの中で行う。これにより
//!   同じ部屋の全参加者が変更を同じ順序で観測できる
//! - 2 つのロックを同時に保持することはない（デッドロック回避）
//!
//! 部屋の解体は内側ロックの `closed` フラグで先にマークしてから
//! HashMap のエントリを削除します。Arc を取得済みの並行タスクは
//! `closed` を見て古い部屋への操作を中止します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, DomainError, GroupId, LeaveOutcome, Participant, ParticipantId, PusherChannel,
    RegistryError, RoomInfo, RoomRegistry, SessionRoom, StatusPatch,
};
use crate::infrastructure::dto::websocket::{
    ChatHistoryFrame, ChatMessageFrame, ConnectionEstablishedFrame, MessageType,
    ParticipantsUpdateFrame,
};

/// 部屋 1 つ分の状態
///
/// ドメインモデルと、参加者ごとの送信チャンネルをまとめて 1 つの
/// ロックで守る。
struct RoomShard {
    /// Room ドメインモデル
    room: SessionRoom,
    /// 参加者ごとの WebSocket 送信チャンネル
    channels: HashMap<ParticipantId, PusherChannel>,
    /// 解体済みフラグ（true の部屋は HashMap から削除されるのを待つだけ）
    closed: bool,
}

impl RoomShard {
    fn new(room: SessionRoom) -> Self {
        Self {
            room,
            channels: HashMap::new(),
            closed: false,
        }
    }
}

/// インメモリ Room Registry 実装
///
/// GroupId ごとの RoomShard を保持し、ドメイン層の RoomRegistry trait を
/// 実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    /// GroupId → 部屋の状態
    rooms: Mutex<HashMap<GroupId, Arc<Mutex<RoomShard>>>>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定された部屋の Arc を取り出す（外側のロックは即座に手放す）
    async fn shard(&self, group_id: &GroupId) -> Option<Arc<Mutex<RoomShard>>> {
        let rooms = self.rooms.lock().await;
        rooms.get(group_id).cloned()
    }

    fn connection_established_frame(room: &SessionRoom, participant_id: &ParticipantId) -> String {
        let frame = ConnectionEstablishedFrame {
            r#type: MessageType::ConnectionEstablished,
            participant_id: participant_id.to_string(),
            room_info: (&room.info).into(),
        };
        serde_json::to_string(&frame).unwrap()
    }

    fn participants_update_frame(room: &SessionRoom) -> String {
        let frame = ParticipantsUpdateFrame {
            r#type: MessageType::ParticipantsUpdate,
            participants: room.participants.iter().map(Into::into).collect(),
            room_info: (&room.info).into(),
        };
        serde_json::to_string(&frame).unwrap()
    }

    fn chat_history_frame(room: &SessionRoom) -> String {
        let frame = ChatHistoryFrame {
            r#type: MessageType::ChatHistory,
            messages: room.chat_history.iter().map(Into::into).collect(),
        };
        serde_json::to_string(&frame).unwrap()
    }

    fn chat_message_frame(message: &ChatMessage) -> String {
        let frame = ChatMessageFrame {
            r#type: MessageType::ChatMessage,
            message: message.into(),
        };
        serde_json::to_string(&frame).unwrap()
    }

    /// 1 つのチャンネルへフレームを enqueue する
    ///
    /// 送信失敗（受信側が既に閉じている）は記録するだけで処理を続ける。
    fn push_to(participant_id: &ParticipantId, channel: &PusherChannel, frame: String) {
        if let Err(e) = channel.send(frame) {
            tracing::warn!("Failed to push frame to participant '{}': {}", participant_id, e);
        }
    }

    /// 部屋の全チャンネルへフレームを enqueue する
    fn push_to_all(channels: &HashMap<ParticipantId, PusherChannel>, frame: &str) {
        for (participant_id, channel) in channels {
            Self::push_to(participant_id, channel, frame.to_string());
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(
        &self,
        info: RoomInfo,
        participant: Participant,
        channel: PusherChannel,
    ) -> Result<usize, RegistryError> {
        loop {
            // 1. 部屋の Arc を取得（存在しなければここで作成）
            let shard = {
                let mut rooms = self.rooms.lock().await;
                rooms
                    .entry(info.group_id.clone())
                    .or_insert_with(|| {
                        tracing::info!("Creating session room for group '{}'", info.group_id.as_str());
                        Arc::new(Mutex::new(RoomShard::new(SessionRoom::new(info.clone()))))
                    })
                    .clone()
            };

            let mut guard = shard.lock().await;

            // 2. Arc 取得と内側ロック取得の間に解体された部屋なら、
            //    古いエントリを掃除してやり直す
            if guard.closed {
                drop(guard);
                let mut rooms = self.rooms.lock().await;
                if let Some(current) = rooms.get(&info.group_id) {
                    if Arc::ptr_eq(current, &shard) {
                        rooms.remove(&info.group_id);
                    }
                }
                continue;
            }

            // 3. 参加者を登録（重複チェックはドメインモデル側）
            guard.room.add_participant(participant.clone()).map_err(|e| match e {
                DomainError::DuplicateParticipant(id) => RegistryError::DuplicateParticipant(id),
                DomainError::ParticipantNotFound(id) => RegistryError::ParticipantNotFound(id),
            })?;
            guard.channels.insert(participant.id, channel.clone());

            // 4. ロックを保持したままフレームを enqueue する
            //    （参加者本人 → connection_established、全員 → participants_update、
            //      履歴があれば参加者本人 → chat_history の順）
            Self::push_to(
                &participant.id,
                &channel,
                Self::connection_established_frame(&guard.room, &participant.id),
            );
            let update = Self::participants_update_frame(&guard.room);
            Self::push_to_all(&guard.channels, &update);
            if !guard.room.chat_history.is_empty() {
                Self::push_to(&participant.id, &channel, Self::chat_history_frame(&guard.room));
            }

            return Ok(guard.room.participant_count());
        }
    }

    async fn leave(&self, group_id: &GroupId, participant_id: &ParticipantId) -> LeaveOutcome {
        let Some(shard) = self.shard(group_id).await else {
            return LeaveOutcome {
                removed: false,
                remaining: 0,
                torn_down: false,
            };
        };

        let (outcome, torn_down_shard) = {
            let mut guard = shard.lock().await;
            if guard.closed {
                (
                    LeaveOutcome {
                        removed: false,
                        remaining: 0,
                        torn_down: false,
                    },
                    None,
                )
            } else {
                let removed = guard.room.remove_participant(participant_id).is_some();
                guard.channels.remove(participant_id);
                let remaining = guard.room.participant_count();

                if removed && guard.room.is_empty() {
                    // 最後の参加者が退出したので部屋ごと解体する
                    guard.closed = true;
                    (
                        LeaveOutcome {
                            removed,
                            remaining,
                            torn_down: true,
                        },
                        Some(shard.clone()),
                    )
                } else {
                    if removed {
                        let update = Self::participants_update_frame(&guard.room);
                        Self::push_to_all(&guard.channels, &update);
                    }
                    (
                        LeaveOutcome {
                            removed,
                            remaining,
                            torn_down: false,
                        },
                        None,
                    )
                }
            }
        };

        // 5. 内側ロックを手放してから HashMap のエントリを削除する
        //    （join が先に新しい部屋を作っていた場合はそちらを残す）
        if let Some(closed_shard) = torn_down_shard {
            let mut rooms = self.rooms.lock().await;
            if let Some(current) = rooms.get(group_id) {
                if Arc::ptr_eq(current, &closed_shard) {
                    rooms.remove(group_id);
                }
            }
            tracing::info!("Session room for group '{}' torn down", group_id.as_str());
        }

        outcome
    }

    async fn update_status(
        &self,
        group_id: &GroupId,
        participant_id: &ParticipantId,
        patch: StatusPatch,
    ) -> Result<(), RegistryError> {
        let Some(shard) = self.shard(group_id).await else {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        };

        let mut guard = shard.lock().await;
        if guard.closed {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        }

        guard.room.update_status(participant_id, patch).map_err(|e| match e {
            DomainError::ParticipantNotFound(id) => RegistryError::ParticipantNotFound(id),
            DomainError::DuplicateParticipant(id) => RegistryError::DuplicateParticipant(id),
        })?;

        let update = Self::participants_update_frame(&guard.room);
        Self::push_to_all(&guard.channels, &update);
        Ok(())
    }

    async fn append_chat(
        &self,
        group_id: &GroupId,
        message: ChatMessage,
    ) -> Result<(), RegistryError> {
        let Some(shard) = self.shard(group_id).await else {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        };

        let mut guard = shard.lock().await;
        if guard.closed {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        }

        let frame = Self::chat_message_frame(&message);
        guard.room.append_chat(message);
        Self::push_to_all(&guard.channels, &frame);
        Ok(())
    }

    async fn relay_to(
        &self,
        group_id: &GroupId,
        target: &ParticipantId,
        frame: String,
    ) -> Result<(), RegistryError> {
        let Some(shard) = self.shard(group_id).await else {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        };

        let guard = shard.lock().await;
        if guard.closed {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        }

        match guard.channels.get(target) {
            Some(channel) => {
                Self::push_to(target, channel, frame);
                Ok(())
            }
            None => Err(RegistryError::ParticipantNotFound(target.to_string())),
        }
    }

    async fn broadcast(&self, group_id: &GroupId, frame: String) -> Result<(), RegistryError> {
        let Some(shard) = self.shard(group_id).await else {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        };

        let guard = shard.lock().await;
        if guard.closed {
            return Err(RegistryError::RoomNotFound(group_id.as_str().to_string()));
        }

        Self::push_to_all(&guard.channels, &frame);
        Ok(())
    }

    async fn snapshot(&self, group_id: &GroupId) -> Option<SessionRoom> {
        let shard = self.shard(group_id).await?;
        let guard = shard.lock().await;
        if guard.closed {
            return None;
        }
        Some(guard.room.clone())
    }

    async fn snapshots(&self) -> Vec<SessionRoom> {
        // 外側のロックは Arc の収集だけに使う（内側ロックと同時に保持しない）
        let shards: Vec<Arc<Mutex<RoomShard>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(shards.len());
        for shard in shards {
            let guard = shard.lock().await;
            if !guard.closed {
                snapshots.push(guard.room.clone());
            }
        }
        snapshots
    }
}

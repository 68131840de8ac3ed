//! ドメイン層
//!
//! セッション調整サブシステムのドメインモデルと、Infrastructure 層が
//! 実装するインターフェース（RoomRegistry / GroupStore）を定義する。

pub mod entity;
pub mod error;
pub mod group_store;
pub mod registry;
pub mod room;
pub mod value_object;

pub use entity::{ChatMessage, Participant, RoomInfo, StatusPatch};
pub use error::{DomainError, GroupStoreError, RegistryError, ValidationError};
pub use group_store::{GroupRecord, GroupStore};
pub use registry::{LeaveOutcome, PusherChannel, RoomRegistry};
pub use room::SessionRoom;
pub use value_object::{
    ChatText, DisplayName, GroupId, MessageId, ParticipantId, Timestamp, UserId,
};

#[cfg(test)]
pub use group_store::MockGroupStore;
#[cfg(test)]
pub use registry::MockRoomRegistry;

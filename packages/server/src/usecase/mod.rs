//! UseCase 層
//!
//! 1 操作 = 1 ユースケース。UI 層（WebSocket / HTTP ハンドラ）から呼ばれ、
//! ドメイン層の trait（RoomRegistry / GroupStore）にのみ依存する。

pub mod error;

mod get_session_detail;
mod get_sessions;
mod join_session;
mod leave_session;
mod raise_hand;
mod relay_signal;
mod send_chat;
mod update_status;

pub use error::{
    GetSessionDetailError, HandRaiseError, JoinError, SendChatError, StatusUpdateError,
};
pub use get_session_detail::GetSessionDetailUseCase;
pub use get_sessions::GetSessionsUseCase;
pub use join_session::{JoinSessionUseCase, JoinedSession};
pub use leave_session::LeaveSessionUseCase;
pub use raise_hand::RaiseHandUseCase;
pub use relay_signal::{RelayOutcome, RelaySignalUseCase};
pub use send_chat::SendChatUseCase;
pub use update_status::UpdateStatusUseCase;

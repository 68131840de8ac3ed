//! RoomRegistry 実装
//!
//! - `inmemory`: HashMap ベースのインメモリ実装

mod inmemory;

pub use inmemory::InMemoryRoomRegistry;

//! GroupStore 実装
//!
//! - `inmemory`: シードファイルから読み込むインメモリ実装

mod inmemory;

pub use inmemory::{InMemoryGroupStore, SeedError};

//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、プロトコルごとの DTO。

pub mod dto;
pub mod group_store;
pub mod registry;

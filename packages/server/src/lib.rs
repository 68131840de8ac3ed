//! Study-group live session coordinator library.
//!
//! This library provides the server-side implementation of the Juku study
//! group sessions: WebSocket room membership, participant presence, chat
//! relay and WebRTC signaling relay.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

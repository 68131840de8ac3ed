//! Shared utilities for the Juku workspace.
//!
//! Provides logging setup and time helpers used by every binary.

pub mod logger;
pub mod time;

//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own board state and its concurrency rules so route
//! handlers can stay focused on protocol translation.

pub mod board;
pub mod notifier;

//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the board store and the parsed server config. Each live board
//! keeps its items and version behind its own lock, plus a watch channel
//! that long-poll readers subscribe to.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, watch};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::services::board::BoardStore;

// =============================================================================
// ITEM
// =============================================================================

/// A sticky note on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    /// Board version at this item's last write. Internal, never serialized.
    #[serde(skip)]
    pub version: u64,
    pub text: String,
    pub color: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Item {
    /// Build an unstamped item from a draft. The draft's `id` and `version`
    /// are never read.
    pub(crate) fn from_draft(id: Uuid, draft: ItemDraft) -> Self {
        let mut item = Self {
            id,
            version: 0,
            text: String::new(),
            color: String::new(),
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        item.apply(draft);
        item
    }

    /// Overwrite every mutable field from `draft`. Identity and version stay put.
    pub(crate) fn apply(&mut self, draft: ItemDraft) {
        self.text = draft.text;
        self.color = draft.color;
        self.left = draft.left;
        self.top = draft.top;
        self.width = draft.width;
        self.height = draft.height;
    }
}

/// Item fields supplied by a client on create or update.
///
/// Clients tend to echo a whole item back, so `id` and `version` are
/// accepted here, but the store ignores both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemDraft {
    pub id: Option<String>,
    pub version: Option<u64>,
    pub text: String,
    pub color: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

// =============================================================================
// BOARD SNAPSHOT
// =============================================================================

/// Point-in-time copy of a board, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub items: HashMap<Uuid, Item>,
    pub version: u64,
}

impl Board {
    /// An empty board at `version`. Long-poll timeouts answer with this.
    #[must_use]
    pub fn unchanged(id: Uuid, version: u64) -> Self {
        Self { id, items: HashMap::new(), version }
    }
}

// =============================================================================
// BOARD STATE
// =============================================================================

/// Mutable part of a live board. Only reachable through [`BoardState::lock`].
#[derive(Debug, Default)]
pub struct BoardContents {
    /// Current items keyed by item ID.
    pub items: HashMap<Uuid, Item>,
    /// Advanced by exactly one per committed write.
    pub version: u64,
}

impl BoardContents {
    #[must_use]
    pub fn to_board(&self, id: Uuid) -> Board {
        Board { id, items: self.items.clone(), version: self.version }
    }
}

/// Per-board live state: the lock over items and version, and the channel
/// that carries each committed version to long-poll waiters.
#[derive(Debug)]
pub struct BoardState {
    id: Uuid,
    contents: Mutex<BoardContents>,
    updates: watch::Sender<u64>,
}

impl BoardState {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        let (updates, _) = watch::channel(0);
        Self { id, contents: Mutex::new(BoardContents::default()), updates }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Acquire the board lock.
    pub async fn lock(&self) -> MutexGuard<'_, BoardContents> {
        self.contents.lock().await
    }

    /// Copy the board under its lock.
    pub async fn snapshot(&self) -> Board {
        self.lock().await.to_board(self.id)
    }

    /// Subscribe to committed versions. The returned receiver treats the
    /// current value as already seen.
    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    /// Wake every subscriber with `version`. Callers hold the board lock.
    pub(crate) fn publish(&self, version: u64) {
        self.updates.send_replace(version);
    }

    /// Number of tasks currently subscribed for updates.
    #[must_use]
    pub fn waiter_count(&self) -> usize {
        self.updates.receiver_count()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: BoardStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: BoardStore, config: ServerConfig) -> Self {
        Self { store, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

//! Board store — boards, items, and per-board versioning.
//!
//! DESIGN
//! ======
//! The store maps board IDs to shared `BoardState` handles. The registry
//! lock is held only for the ID lookup (read) or board creation (write);
//! every item mutation happens under the owning board's own lock, so
//! writes to different boards never contend.
//!
//! Every successful write runs the commit step while still holding the
//! board lock: bump the board version by one, stamp the changed item with
//! it, and publish it to long-poll waiters. That makes the version
//! sequence gap-free and guarantees a waiter woken for version N sees the
//! write that produced N.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::state::{Board, BoardContents, BoardState, Item, ItemDraft};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board not found: {0}")]
    BoardNotFound(String),
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ErrorCode for BoardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BoardNotFound(_) => "E_BOARD_NOT_FOUND",
            Self::ItemNotFound(_) => "E_ITEM_NOT_FOUND",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
        }
    }
}

/// In-memory board registry. Cheap to clone; clones share the same boards.
#[derive(Clone, Default)]
pub struct BoardStore {
    boards: Arc<RwLock<HashMap<Uuid, Arc<BoardState>>>>,
}

impl BoardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// Create an empty board at version 0.
    pub async fn create_board(&self) -> Board {
        let board = Arc::new(BoardState::new(Uuid::new_v4()));
        let id = board.id();
        let total = {
            let mut boards = self.boards.write().await;
            boards.insert(id, board);
            boards.len()
        };
        info!(%id, total, "board created");
        Board::unchanged(id, 0)
    }

    /// Resolve a board handle.
    ///
    /// # Errors
    ///
    /// Returns `BoardNotFound` if no board has this ID.
    pub async fn get_board(&self, board_id: Uuid) -> Result<Arc<BoardState>, BoardError> {
        self.boards
            .read()
            .await
            .get(&board_id)
            .cloned()
            .ok_or_else(|| BoardError::BoardNotFound(board_id.to_string()))
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Create an item from `draft` under a fresh ID and commit it.
    ///
    /// # Errors
    ///
    /// Returns `BoardNotFound` if the board doesn't exist.
    pub async fn create_item(&self, board_id: Uuid, draft: ItemDraft) -> Result<Item, BoardError> {
        let board = self.get_board(board_id).await?;
        let mut contents = board.lock().await;

        let mut id = Uuid::new_v4();
        while contents.items.contains_key(&id) {
            id = Uuid::new_v4();
        }

        Ok(commit(&board, &mut contents, Item::from_draft(id, draft)))
    }

    /// Overwrite an item's fields from `draft` and commit it. The item keeps
    /// its ID whatever the draft carries. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `BoardNotFound` or `ItemNotFound` if either lookup fails, and
    /// `InvalidInput` if `draft` is absent.
    pub async fn update_item(
        &self,
        board_id: Uuid,
        item_id: Uuid,
        draft: Option<ItemDraft>,
    ) -> Result<Item, BoardError> {
        let board = self.get_board(board_id).await?;
        let mut contents = board.lock().await;

        let mut item = contents
            .items
            .get(&item_id)
            .cloned()
            .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))?;
        let Some(draft) = draft else {
            return Err(BoardError::InvalidInput("missing item payload".into()));
        };
        item.apply(draft);

        Ok(commit(&board, &mut contents, item))
    }
}

/// Look up an item on an already-resolved board.
///
/// # Errors
///
/// Returns `ItemNotFound` if the board has no item with this ID.
pub async fn get_item(board: &BoardState, item_id: Uuid) -> Result<Item, BoardError> {
    board
        .lock()
        .await
        .items
        .get(&item_id)
        .cloned()
        .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))
}

/// Advance the board version, store `item` stamped with it, and wake waiters.
///
/// `contents` must be the guard for `board`'s lock.
fn commit(board: &BoardState, contents: &mut BoardContents, mut item: Item) -> Item {
    contents.version += 1;
    let version = contents.version;

    item.version = version;
    contents.items.insert(item.id, item.clone());

    board.publish(version);
    debug!(
        board_id = %board.id(),
        item_id = %item.id,
        version,
        waiters = board.waiter_count(),
        "board version advanced"
    );

    item
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;

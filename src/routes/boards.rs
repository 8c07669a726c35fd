//! Board and item routes, including the long-poll update feed.
//!
//! Path IDs are taken as raw strings: an ID that isn't a UUID can't name
//! any board or item, so it reports the same not-found error as an unknown
//! one rather than a generic path rejection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services;
use crate::services::board::BoardError;
use crate::state::{AppState, Board, Item, ItemDraft};

/// `POST /api/board` — create a new board.
pub async fn create_board(State(state): State<AppState>) -> Json<Board> {
    Json(state.store.create_board().await)
}

/// `GET /api/board/:board_id` — fetch a board with all its items.
pub async fn get_board(State(state): State<AppState>, Path(board_id): Path<String>) -> ApiResult<Json<Board>> {
    let board = state.store.get_board(parse_board_id(&board_id)?).await?;
    Ok(Json(board.snapshot().await))
}

/// `POST /api/board/:board_id/item` — create an item. An empty body
/// creates an item with default fields. An unknown board is reported
/// before a malformed body.
pub async fn create_item(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Item>> {
    let board_id = state.store.get_board(parse_board_id(&board_id)?).await?.id();
    let draft = parse_draft(&body)?.unwrap_or_default();
    Ok(Json(state.store.create_item(board_id, draft).await?))
}

/// `GET /api/board/:board_id/item/:item_id` — fetch one item.
pub async fn get_item(
    State(state): State<AppState>,
    Path((board_id, item_id)): Path<(String, String)>,
) -> ApiResult<Json<Item>> {
    let board = state.store.get_board(parse_board_id(&board_id)?).await?;
    let item = services::board::get_item(&board, parse_item_id(&item_id)?).await?;
    Ok(Json(item))
}

/// `PUT /api/board/:board_id/item/:item_id` — overwrite an item. Board and
/// item lookups are reported before a malformed body.
pub async fn update_item(
    State(state): State<AppState>,
    Path((board_id, item_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Json<Item>> {
    let board = state.store.get_board(parse_board_id(&board_id)?).await?;
    let item_id = services::board::get_item(&board, parse_item_id(&item_id)?).await?.id;
    let draft = parse_draft(&body)?;
    Ok(Json(state.store.update_item(board.id(), item_id, draft).await?))
}

/// `GET /api/board/:board_id/updates/:version` — long-poll for changes.
///
/// Answers as soon as the board version differs from `version`. If nothing
/// changes within the configured timeout, answers with an empty item map at
/// the caller's own `version` so the client polls again from there.
pub async fn get_board_updates(
    State(state): State<AppState>,
    Path((board_id, version)): Path<(String, String)>,
) -> ApiResult<Json<Board>> {
    let since_version = version
        .parse::<u64>()
        .map_err(|_| ApiError::InvalidVersion(version))?;
    let board = state.store.get_board(parse_board_id(&board_id)?).await?;

    let wait = services::notifier::wait_for_update(&board, since_version);
    if let Ok(snapshot) = tokio::time::timeout(state.config.long_poll_timeout, wait).await {
        return Ok(Json(snapshot));
    }
    debug!(board_id = %board.id(), since_version, "long-poll timed out without changes");
    Ok(Json(Board::unchanged(board.id(), since_version)))
}

// =============================================================================
// HELPERS
// =============================================================================

fn parse_board_id(raw: &str) -> Result<Uuid, BoardError> {
    Uuid::parse_str(raw).map_err(|_| BoardError::BoardNotFound(raw.to_owned()))
}

fn parse_item_id(raw: &str) -> Result<Uuid, BoardError> {
    Uuid::parse_str(raw).map_err(|_| BoardError::ItemNotFound(raw.to_owned()))
}

/// Decode an item body. Empty and `null` bodies are an absent draft.
pub(crate) fn parse_draft(body: &[u8]) -> Result<Option<ItemDraft>, BoardError> {
    if body.trim_ascii().is_empty() {
        return Ok(None);
    }
    serde_json::from_slice::<Option<ItemDraft>>(body).map_err(|e| BoardError::InvalidInput(e.to_string()))
}

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;

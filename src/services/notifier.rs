//! Update notifier — long-poll wait on a board's version.
//!
//! DESIGN
//! ======
//! Each board carries a `watch` channel that the store publishes every
//! committed version to. A waiter checks the version under the board lock
//! and, if nothing changed yet, subscribes before releasing that lock.
//! Commits also run under the lock, so any commit that lands after the
//! check is guaranteed to mark the new receiver as changed: no wakeup can
//! fall between the check and the wait.
//!
//! After every wake the version is checked again under the lock, so
//! coalesced or unrelated wakes are harmless. All receivers see every
//! publish, so one commit releases every waiter on the board.
//!
//! CANCELLATION
//! ============
//! There is no timeout here. Dropping the returned future drops the
//! receiver and nothing else; the lock is never held across an await.

use tracing::trace;

use crate::state::{Board, BoardState};

/// Return a snapshot of `board` once its version differs from
/// `since_version`. Returns immediately if it already does.
pub async fn wait_for_update(board: &BoardState, since_version: u64) -> Board {
    loop {
        let mut updates = {
            let contents = board.lock().await;
            if contents.version != since_version {
                return contents.to_board(board.id());
            }
            board.subscribe()
        };

        trace!(board_id = %board.id(), since_version, "waiting for board update");
        if updates.changed().await.is_err() {
            // Sender lives on the board; only reachable if the board is torn down.
            return board.snapshot().await;
        }
    }
}

#[cfg(test)]
#[path = "notifier_test.rs"]
mod tests;

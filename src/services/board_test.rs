use super::*;
use crate::state::test_helpers::dummy_draft;

#[tokio::test]
async fn create_board_starts_empty_at_version_zero() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    assert_eq!(board.version, 0);
    assert!(board.items.is_empty());
    assert!(store.get_board(board.id).await.is_ok());

    let other = store.create_board().await;
    assert_ne!(board.id, other.id);
}

#[tokio::test]
async fn get_board_resolves_created_board() {
    let store = BoardStore::new();
    let created = store.create_board().await;
    let handle = store.get_board(created.id).await.unwrap();
    assert_eq!(handle.id(), created.id);
    assert_eq!(handle.snapshot().await, created);
}

#[tokio::test]
async fn get_board_unknown_id() {
    let store = BoardStore::new();
    let missing = Uuid::new_v4();
    let err = store.get_board(missing).await.unwrap_err();
    assert_eq!(err, BoardError::BoardNotFound(missing.to_string()));
}

#[tokio::test]
async fn create_item_copies_draft_and_stamps_version() {
    let store = BoardStore::new();
    let board = store.create_board().await;

    let mut draft = dummy_draft("bar");
    draft.id = Some("foo".into());
    draft.version = Some(42);
    let item = store.create_item(board.id, draft).await.unwrap();

    assert_eq!(item.version, 1);
    assert_eq!(item.text, "bar");
    assert_eq!(item.color, "#FFEB3B");
    assert!((item.left - 100.0).abs() < f64::EPSILON);
    assert!((item.top - 200.0).abs() < f64::EPSILON);
    assert!((item.width - 120.0).abs() < f64::EPSILON);
    assert!((item.height - 80.0).abs() < f64::EPSILON);

    let snapshot = store.get_board(board.id).await.unwrap().snapshot().await;
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.items.get(&item.id), Some(&item));
}

#[tokio::test]
async fn create_item_unknown_board() {
    let store = BoardStore::new();
    let result = store.create_item(Uuid::new_v4(), dummy_draft("x")).await;
    assert!(matches!(result.unwrap_err(), BoardError::BoardNotFound(_)));
}

#[tokio::test]
async fn item_version_matches_board_version_at_creation() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    for expected in 1..=5 {
        let item = store.create_item(board.id, dummy_draft("n")).await.unwrap();
        let handle = store.get_board(board.id).await.unwrap();
        assert_eq!(item.version, expected);
        assert_eq!(handle.snapshot().await.version, expected);
    }
}

#[tokio::test]
async fn get_item_returns_stored_item() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let created = store.create_item(board.id, dummy_draft("bar")).await.unwrap();

    let handle = store.get_board(board.id).await.unwrap();
    let result = get_item(&handle, created.id).await.unwrap();
    assert_eq!(result, created);

    let missing = Uuid::new_v4();
    let err = get_item(&handle, missing).await.unwrap_err();
    assert_eq!(err, BoardError::ItemNotFound(missing.to_string()));
}

#[tokio::test]
async fn update_item_overwrites_fields_and_keeps_id() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let created = store.create_item(board.id, dummy_draft("foo")).await.unwrap();

    let draft = ItemDraft {
        id: Some(Uuid::new_v4().to_string()),
        version: Some(1),
        text: "bar".into(),
        color: "green".into(),
        left: 4.0,
        top: 5.0,
        width: 6.0,
        height: 7.0,
    };
    let updated = store.update_item(board.id, created.id, Some(draft)).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.text, "bar");
    assert_eq!(updated.color, "green");
    assert!((updated.left - 4.0).abs() < f64::EPSILON);
    assert!((updated.top - 5.0).abs() < f64::EPSILON);
    assert!((updated.width - 6.0).abs() < f64::EPSILON);
    assert!((updated.height - 7.0).abs() < f64::EPSILON);

    let handle = store.get_board(board.id).await.unwrap();
    assert_eq!(get_item(&handle, created.id).await.unwrap(), updated);
    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.items.len(), 1);
}

#[tokio::test]
async fn update_item_cannot_hijack_other_item() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let first = store.create_item(board.id, dummy_draft("first")).await.unwrap();
    let second = store.create_item(board.id, dummy_draft("second")).await.unwrap();

    let mut draft = dummy_draft("changed");
    draft.id = Some(second.id.to_string());
    let updated = store.update_item(board.id, first.id, Some(draft)).await.unwrap();
    assert_eq!(updated.id, first.id);

    let handle = store.get_board(board.id).await.unwrap();
    assert_eq!(get_item(&handle, second.id).await.unwrap().text, "second");
    assert_eq!(get_item(&handle, first.id).await.unwrap().text, "changed");
}

#[tokio::test]
async fn update_item_errors() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let created = store.create_item(board.id, dummy_draft("foo")).await.unwrap();

    let result = store.update_item(Uuid::new_v4(), created.id, Some(dummy_draft("x"))).await;
    assert!(matches!(result.unwrap_err(), BoardError::BoardNotFound(_)));

    let result = store.update_item(board.id, Uuid::new_v4(), Some(dummy_draft("x"))).await;
    assert!(matches!(result.unwrap_err(), BoardError::ItemNotFound(_)));

    let result = store.update_item(board.id, created.id, None).await;
    assert!(matches!(result.unwrap_err(), BoardError::InvalidInput(_)));
}

#[tokio::test]
async fn failed_writes_do_not_advance_version() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let created = store.create_item(board.id, dummy_draft("foo")).await.unwrap();

    let _ = store.update_item(board.id, Uuid::new_v4(), Some(dummy_draft("x"))).await;
    let _ = store.update_item(board.id, created.id, None).await;

    let handle = store.get_board(board.id).await.unwrap();
    let snapshot = handle.snapshot().await;
    assert_eq!(snapshot.version, 1);
    assert_eq!(snapshot.items[&created.id].text, "foo");
}

#[tokio::test]
async fn reads_do_not_advance_version() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let created = store.create_item(board.id, dummy_draft("foo")).await.unwrap();

    let handle = store.get_board(board.id).await.unwrap();
    for _ in 0..3 {
        let _ = get_item(&handle, created.id).await;
        let _ = handle.snapshot().await;
    }
    assert_eq!(handle.snapshot().await.version, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_lose_no_increments() {
    let store = BoardStore::new();
    let board = store.create_board().await;
    let seed = store.create_item(board.id, dummy_draft("seed")).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        let board_id = board.id;
        let seed_id = seed.id;
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                store.create_item(board_id, dummy_draft("c")).await.map(|_| ())
            } else {
                store.update_item(board_id, seed_id, Some(dummy_draft("u"))).await.map(|_| ())
            }
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let snapshot = store.get_board(board.id).await.unwrap().snapshot().await;
    assert_eq!(snapshot.version, 51);
    assert_eq!(snapshot.items.len(), 26);
    for item in snapshot.items.values() {
        assert!(item.version <= snapshot.version);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_concurrent_creates_end_at_version_two() {
    let store = BoardStore::new();
    let board = store.create_board().await;

    let (a, b) = tokio::join!(
        store.create_item(board.id, dummy_draft("a")),
        store.create_item(board.id, dummy_draft("b")),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    let mut versions = [a.version, b.version];
    versions.sort_unstable();
    assert_eq!(versions, [1, 2]);
    assert_eq!(store.get_board(board.id).await.unwrap().snapshot().await.version, 2);
}

#[tokio::test]
async fn boards_version_independently() {
    let store = BoardStore::new();
    let a = store.create_board().await;
    let b = store.create_board().await;

    store.create_item(a.id, dummy_draft("a1")).await.unwrap();
    store.create_item(a.id, dummy_draft("a2")).await.unwrap();
    store.create_item(b.id, dummy_draft("b1")).await.unwrap();

    assert_eq!(store.get_board(a.id).await.unwrap().snapshot().await.version, 2);
    assert_eq!(store.get_board(b.id).await.unwrap().snapshot().await.version, 1);
}

#[test]
fn board_error_codes() {
    assert_eq!(BoardError::BoardNotFound(String::new()).error_code(), "E_BOARD_NOT_FOUND");
    assert_eq!(BoardError::ItemNotFound(String::new()).error_code(), "E_ITEM_NOT_FOUND");
    assert_eq!(BoardError::InvalidInput(String::new()).error_code(), "E_INVALID_INPUT");
}

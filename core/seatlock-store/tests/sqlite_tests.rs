use chrono::{TimeZone, Utc};
use seatlock_store::{AccountStore, NewAccount, SqliteStore};

fn new_account(id: &str) -> NewAccount {
    NewAccount {
        id: id.to_string(),
        credential_hash: "h".to_string(),
        duration_secs: 3600,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");
    let activated = Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap();

    {
        let store = SqliteStore::open(&path).unwrap();
        store.insert_account(new_account("ana")).await.unwrap();
        store.set_activation_time_if_unset("ana", activated).await.unwrap();
        store.establish_session("ana", "laptop", "tok", activated).await.unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let account = store.get_account("ana").await.unwrap();
    assert_eq!(account.activated_at, Some(activated));
    let session = store.get_session("ana").await.unwrap().unwrap();
    assert_eq!(session.device_id, "laptop");
    assert_eq!(session.token, "tok");
}

#[tokio::test]
async fn timestamps_keep_millisecond_precision() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_account(new_account("ana")).await.unwrap();
    let at = Utc.timestamp_millis_opt(1_748_768_400_123).unwrap();
    let stored = store.set_activation_time_if_unset("ana", at).await.unwrap();
    assert_eq!(stored, at);
}

#[test]
fn open_fails_on_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SqliteStore::open(dir.path()).is_err());
}

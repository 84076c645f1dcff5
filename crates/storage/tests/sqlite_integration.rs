use portal_core::model::{PersistScope, Role, User};
use storage::repository::{KeyValueStore, Storage};
use storage::session_store::{ACCESS_TOKEN_KEY, SessionStore, USER_DATA_KEY};
use storage::sqlite::SqliteRepository;

fn student() -> User {
    serde_json::from_str(
        r#"{"id":1,"fullName":"A","email":"a@b.com","role":"student","registrationNo":"CS-01"}"#,
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_kv_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("theme").await.unwrap(), None);
    repo.set("theme", "light").await.unwrap();
    repo.set("theme", "dark").await.unwrap();
    assert_eq!(repo.get("theme").await.unwrap().as_deref(), Some("dark"));

    repo.remove("theme").await.unwrap();
    assert_eq!(repo.get("theme").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn remembered_session_lands_in_sqlite_scope() {
    let storage = Storage::sqlite("sqlite:file:memdb_session?mode=memory&cache=shared")
        .await
        .expect("storage");
    let sessions = SessionStore::new(storage.clone());

    sessions
        .save(PersistScope::Persistent, "t1", Some("r1"), &student())
        .await
        .unwrap();

    assert_eq!(
        storage.persistent.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(),
        Some("t1")
    );
    assert_eq!(storage.session.get(USER_DATA_KEY).await.unwrap(), None);

    let loaded = sessions.load().await.unwrap().expect("session");
    assert_eq!(loaded.user.role, Role::Student);
    assert_eq!(
        loaded.user.extra.get("registrationNo").and_then(|v| v.as_str()),
        Some("CS-01")
    );
}

#[tokio::test]
async fn non_remembered_session_skips_sqlite() {
    let storage = Storage::sqlite("sqlite:file:memdb_session_only?mode=memory&cache=shared")
        .await
        .expect("storage");
    let sessions = SessionStore::new(storage.clone());

    sessions
        .save(PersistScope::SessionOnly, "t1", Some("r1"), &student())
        .await
        .unwrap();

    assert_eq!(storage.persistent.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    let loaded = sessions.load().await.unwrap().expect("session");
    assert_eq!(loaded.scope, PersistScope::SessionOnly);

    sessions.clear().await.unwrap();
    assert_eq!(sessions.load().await.unwrap(), None);
}

use chrono::Duration;
use quiz_core::model::HighScore;
use quiz_core::time::fixed_now;
use storage::repository::{HIGH_SCORE_KEY, HighScoreRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_high_score() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_high_score?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get_high_score().await.unwrap().is_none());

    repo.save_high_score(HighScore::new(3), fixed_now())
        .await
        .unwrap();
    let later = fixed_now() + Duration::minutes(5);
    repo.save_high_score(HighScore::new(7), later).await.unwrap();

    let record = repo.get_high_score().await.unwrap().expect("record");
    assert_eq!(record.score, HighScore::new(7));
    assert_eq!(record.updated_at, Some(later));
}

#[tokio::test]
async fn sqlite_reads_non_numeric_value_as_zero() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_garbage?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)")
        .bind(HIGH_SCORE_KEY)
        .bind("twelve")
        .bind(fixed_now())
        .execute(repo.pool())
        .await
        .unwrap();

    let record = repo.get_high_score().await.unwrap().expect("record");
    assert_eq!(record.score, HighScore::new(0));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_wires_high_score_repo() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .high_scores
        .save_high_score(HighScore::new(5), fixed_now())
        .await
        .unwrap();
    let record = storage.high_scores.get_high_score().await.unwrap();
    assert_eq!(record.map(|r| r.score), Some(HighScore::new(5)));
}

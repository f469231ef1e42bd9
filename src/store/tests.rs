use super::*;
use crate::config::Config;
use sea_orm::ConnectionTrait;

async fn empty_store() -> DatabaseConnection {
    connect(&Config::for_tests())
        .await
        .expect("Failed to open test database")
}

#[tokio::test]
async fn test_initialize_applies_all_then_nothing() {
    let db = empty_store().await;

    assert_eq!(initialize(&db).await.unwrap(), 2);
    assert_eq!(initialize(&db).await.unwrap(), 0);

    let states = status(&db).await.unwrap();
    assert_eq!(states.len(), 2);
    assert!(states.iter().all(|s| s.applied));
}

#[tokio::test]
async fn test_status_reports_pending_steps() {
    let db = empty_store().await;
    Migrator::up(&db, Some(1)).await.unwrap();

    let states = status(&db).await.unwrap();
    assert_eq!(
        states,
        vec![
            MigrationState {
                name: "m20131015_000001_create_datatype_tables".to_string(),
                applied: true,
            },
            MigrationState {
                name: "m20131120_000002_time_series_mapping_flags".to_string(),
                applied: false,
            },
        ]
    );
}

#[tokio::test]
async fn test_reset_drops_datatype_tables() {
    let db = empty_store().await;
    initialize(&db).await.unwrap();

    reset(&db).await.unwrap();

    let states = status(&db).await.unwrap();
    assert!(states.iter().all(|s| !s.applied));
    let result = db
        .execute_unprepared(r#"SELECT 1 FROM "MAPPED_TIME_SERIES_DATA""#)
        .await;
    assert!(result.is_err(), "Tables should be gone after reset");
}

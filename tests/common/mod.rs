use std::sync::Arc;

use chrono::Local;
use kadig_core::db;
use kadig_core::db::DbPool;

/// Directory for this test run's database files
pub fn get_test_db_path(test_id: &str) -> String {
    let now = Local::now();
    now.format(&format!("./tests/output/%Y%m%d/%H%M%S-{}/", test_id))
        .to_string()
}

/// Initializes a fresh database for a test and returns its pool with
/// migrations applied
pub fn setup_pool(test_id: &str) -> Arc<DbPool> {
    let dir = get_test_db_path(test_id);

    let db_path = db::init(&dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    pool
}

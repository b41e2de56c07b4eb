use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub type DbPool = Pool<SqliteConnectionManager>;

pub mod config;
pub mod error;
pub mod helper;
pub mod models;
pub mod routes;
pub mod setup;

fn enable_foreign_keys(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
}

/// Builds the shared connection pool. Each request checks out one connection
/// and returns it when its database work is done.
pub fn build_pool(db_path: &Path, max_size: u32) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(db_path).with_init(enable_foreign_keys);
    Pool::builder().max_size(max_size).build(manager)
}

// A single connection keeps every checkout on the same in-memory database.
#[cfg(test)]
pub(crate) fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory().with_init(enable_foreign_keys);
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .expect("in-memory pool");

    let mut conn = pool.get().expect("in-memory connection");
    setup::db_setup::setup_multimedia_db(&mut conn).expect("schema setup");
    drop(conn);
    pool
}

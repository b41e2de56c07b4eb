use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Creates the dashboard user relation and the multimedia table in one
/// transaction. Safe to run against an existing database.
pub fn setup_multimedia_db(conn: &mut Connection) -> Result<(), SetupError> {
    let tx = conn.transaction()?;

    log::info!("Creating 'dashboard_user' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS dashboard_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    log::info!("Creating 'multimedia' table...");
    tx.execute(
        "CREATE TABLE IF NOT EXISTS multimedia (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            type TEXT NOT NULL CHECK(type IN ('text', 'image', 'video', 'livestream')),
            date_published TEXT NOT NULL,
            is_invalid INTEGER NOT NULL DEFAULT 0,
            author_id INTEGER NOT NULL,
            FOREIGN KEY (author_id) REFERENCES dashboard_user(id)
        )",
        [],
    )?;

    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_multimedia_type ON multimedia(type)",
        [],
    )?;
    tx.execute(
        "CREATE INDEX IF NOT EXISTS idx_multimedia_author ON multimedia(author_id)",
        [],
    )?;

    tx.commit()?;
    Ok(())
}

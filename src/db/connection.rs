use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

/// Open (creating if needed) the database file at `path` and bring the schema
/// up to date. The parent directory is created on first run.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    match ensure_schema(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=file path={}",
                path.display()
            );
            Ok(conn)
        }
        Err(err) => {
            error!("event=db_open module=db status=error mode=file error={err:#}");
            Err(err)
        }
    }
}

/// In-memory variant of [`open_db`], used by tests.
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    info!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

/// Run lazy migrations on a live connection. The function also toggles
/// `PRAGMA foreign_keys = ON` so reviews can only reference existing books and
/// the cascade on `reviews.book_id` actually fires.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            genre TEXT,
            status TEXT NOT NULL DEFAULT 'want_to_read'
                CHECK (status IN ('want_to_read', 'reading', 'completed'))
        )",
        [],
    )
    .context("failed to create books table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            book_id INTEGER NOT NULL,
            FOREIGN KEY(book_id) REFERENCES books(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create reviews table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reviews_book_id ON reviews(book_id)",
        [],
    )
    .context("failed to create reviews index")?;

    Ok(())
}

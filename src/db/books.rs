use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::integrity_error;
use super::reviews::find_reviews_by_book;
use crate::models::{Book, BookStatus, Review, ValidationError};

const BOOK_SELECT_SQL: &str = "SELECT id, title, author, genre, status FROM books";

fn map_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book::from_row(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

/// Run a book query with one bound parameter and collect the hydrated rows.
fn query_books(conn: &Connection, sql: &str, param: impl rusqlite::ToSql) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare(sql).context("failed to prepare book query")?;

    let books = stmt
        .query_map([param], map_book_row)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Retrieve every book in insertion order.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id"))
        .context("failed to prepare book query")?;

    let books = stmt
        .query_map([], map_book_row)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Look up a single book. A missing row is `Ok(None)`, not an error.
pub fn find_book_by_id(conn: &Connection, id: i64) -> Result<Option<Book>> {
    conn.query_row(
        &format!("{BOOK_SELECT_SQL} WHERE id = ?1"),
        [id],
        map_book_row,
    )
    .optional()
    .context("failed to load book")
}

/// Substring search on the title. Matching goes through SQLite `LIKE`, which
/// folds case for ASCII letters only: "great" finds "The Great Gatsby", but
/// "éclat" does not find "Éclat".
pub fn find_books_by_title(conn: &Connection, term: &str) -> Result<Vec<Book>> {
    query_books(
        conn,
        &format!("{BOOK_SELECT_SQL} WHERE title LIKE ?1 ESCAPE '\\' ORDER BY id"),
        like_pattern(term),
    )
}

/// Substring search on the author, with the same ASCII-only case folding as
/// [`find_books_by_title`].
pub fn find_books_by_author(conn: &Connection, term: &str) -> Result<Vec<Book>> {
    query_books(
        conn,
        &format!("{BOOK_SELECT_SQL} WHERE author LIKE ?1 ESCAPE '\\' ORDER BY id"),
        like_pattern(term),
    )
}

/// Books whose status matches exactly, in id order.
pub fn find_books_by_status(conn: &Connection, status: BookStatus) -> Result<Vec<Book>> {
    query_books(
        conn,
        &format!("{BOOK_SELECT_SQL} WHERE status = ?1 ORDER BY id"),
        status,
    )
}

/// Number of stored books. Startup uses it to decide whether to seed, and the
/// menu uses it to skip id prompts when the library is empty.
pub fn count_books(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
        .context("failed to count books")
}

/// Insert the book as a new row and record the generated id on it.
pub fn save_book(conn: &Connection, book: &mut Book) -> Result<i64> {
    conn.execute(
        "INSERT INTO books (title, author, genre, status) VALUES (?1, ?2, ?3, ?4)",
        params![book.title(), book.author(), book.genre(), book.status()],
    )
    .map_err(integrity_error)
    .context("failed to insert book")?;

    let id = conn.last_insert_rowid();
    book.assign_id(id);
    info!("event=book_saved module=db id={id}");
    Ok(id)
}

/// Overwrite every column of an already saved book.
pub fn update_book(conn: &Connection, book: &Book) -> Result<()> {
    let id = book
        .id()
        .ok_or(ValidationError::MissingId("Book", "update"))?;

    let updated = conn
        .execute(
            "UPDATE books SET title = ?1, author = ?2, genre = ?3, status = ?4 WHERE id = ?5",
            params![book.title(), book.author(), book.genre(), book.status(), id],
        )
        .map_err(integrity_error)
        .context("failed to update book")?;

    if updated == 0 {
        return Err(ValidationError::BookNotFound(id).into());
    }
    info!("event=book_updated module=db id={id} status={}", book.status());
    Ok(())
}

/// Delete a book together with its reviews, returning how many reviews went
/// with it. Both deletes share one transaction so no orphan can survive a
/// failure halfway through.
pub fn delete_book(conn: &Connection, book: &Book) -> Result<usize> {
    let id = book
        .id()
        .ok_or(ValidationError::MissingId("Book", "delete"))?;

    let tx = conn
        .unchecked_transaction()
        .context("failed to start delete transaction")?;
    let reviews_removed = tx
        .execute("DELETE FROM reviews WHERE book_id = ?1", [id])
        .context("failed to delete reviews for book")?;
    let deleted = tx
        .execute("DELETE FROM books WHERE id = ?1", [id])
        .context("failed to delete book")?;

    if deleted == 0 {
        return Err(ValidationError::BookNotFound(id).into());
    }
    tx.commit().context("failed to commit book delete")?;

    info!("event=book_deleted module=db id={id} reviews_removed={reviews_removed}");
    Ok(reviews_removed)
}

/// Reviews written for this book, fetched fresh on every call. An unsaved
/// book has none.
pub fn fetch_reviews_for_book(conn: &Connection, book: &Book) -> Result<Vec<Review>> {
    match book.id() {
        Some(id) => find_reviews_by_book(conn, id),
        None => {
            debug!("event=book_reviews module=db status=skipped reason=unsaved");
            Ok(Vec::new())
        }
    }
}

/// Wrap `term` in `%` wildcards, escaping characters `LIKE` treats specially.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_db_in_memory;

    fn book(title: &str, author: &str, status: BookStatus) -> Book {
        Book::new(title, author, None, status).unwrap()
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("great"), "%great%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let conn = open_db_in_memory().unwrap();
        save_book(&conn, &mut book("100% Pure", "Someone", BookStatus::Reading)).unwrap();
        save_book(&conn, &mut book("1000 Years", "Someone", BookStatus::Reading)).unwrap();

        let hits = find_books_by_title(&conn, "100%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title(), "100% Pure");
    }

    #[test]
    fn search_folds_ascii_case_only() {
        let conn = open_db_in_memory().unwrap();
        save_book(&conn, &mut book("The Great Gatsby", "Fitzgerald", BookStatus::Reading)).unwrap();
        save_book(&conn, &mut book("Éclat", "Someone", BookStatus::Reading)).unwrap();

        assert_eq!(find_books_by_title(&conn, "GREAT").unwrap().len(), 1);
        assert_eq!(find_books_by_author(&conn, "fitz").unwrap().len(), 1);
        assert!(find_books_by_title(&conn, "éclat").unwrap().is_empty());
        assert_eq!(find_books_by_title(&conn, "Éclat").unwrap().len(), 1);
    }

    #[test]
    fn status_lookup_is_exact() {
        let conn = open_db_in_memory().unwrap();
        save_book(&conn, &mut book("A", "X", BookStatus::Reading)).unwrap();
        save_book(&conn, &mut book("B", "Y", BookStatus::Completed)).unwrap();
        save_book(&conn, &mut book("C", "Z", BookStatus::Reading)).unwrap();

        let reading = find_books_by_status(&conn, BookStatus::Reading).unwrap();
        let titles: Vec<_> = reading.iter().map(Book::title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(find_books_by_status(&conn, BookStatus::WantToRead)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unsaved_book_cannot_be_updated_or_deleted() {
        let conn = open_db_in_memory().unwrap();
        let unsaved = book("A", "X", BookStatus::Reading);

        let err = update_book(&conn, &unsaved).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingId("Book", "update"))
        );
        let err = delete_book(&conn, &unsaved).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingId("Book", "delete"))
        );
        assert!(fetch_reviews_for_book(&conn, &unsaved).unwrap().is_empty());
    }
}

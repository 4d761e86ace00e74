use anyhow::{Context, Result};
use log::info;
use rusqlite::{ffi, params, Connection, Error as SqlError, OptionalExtension, Row};

use super::integrity_error;
use crate::models::{Review, ValidationError};

const REVIEW_SELECT_SQL: &str = "SELECT id, content, rating, book_id FROM reviews";

fn map_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review::from_row(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
    ))
}

fn query_reviews(conn: &Connection, sql: &str, param: i64) -> Result<Vec<Review>> {
    let mut stmt = conn.prepare(sql).context("failed to prepare review query")?;

    let reviews = stmt
        .query_map([param], map_review_row)
        .context("failed to load reviews")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect reviews")?;

    Ok(reviews)
}

/// Retrieve every review in insertion order.
pub fn fetch_reviews(conn: &Connection) -> Result<Vec<Review>> {
    let mut stmt = conn
        .prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY id"))
        .context("failed to prepare review query")?;

    let reviews = stmt
        .query_map([], map_review_row)
        .context("failed to load reviews")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect reviews")?;

    Ok(reviews)
}

/// Look up a single review. A missing row is `Ok(None)` so callers can
/// print their own "not found" message instead of handling an error.
pub fn find_review_by_id(conn: &Connection, id: i64) -> Result<Option<Review>> {
    conn.query_row(
        &format!("{REVIEW_SELECT_SQL} WHERE id = ?1"),
        [id],
        map_review_row,
    )
    .optional()
    .context("failed to load review")
}

/// Every review written for `book_id`, oldest first. The list is fetched
/// fresh on each call; nothing is cached on the book.
pub fn find_reviews_by_book(conn: &Connection, book_id: i64) -> Result<Vec<Review>> {
    query_reviews(
        conn,
        &format!("{REVIEW_SELECT_SQL} WHERE book_id = ?1 ORDER BY id"),
        book_id,
    )
}

/// Reviews with exactly this star rating. Used by the "find by rating" menu
/// action after the prompt has already checked the 1-5 range.
pub fn find_reviews_by_rating(conn: &Connection, rating: i64) -> Result<Vec<Review>> {
    query_reviews(
        conn,
        &format!("{REVIEW_SELECT_SQL} WHERE rating = ?1 ORDER BY id"),
        rating,
    )
}

/// Number of stored reviews. The menu checks this before asking for a review
/// id so it never prompts against an empty table.
pub fn count_reviews(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))
        .context("failed to count reviews")
}

/// Insert the review as a new row and record the generated id on it. The
/// referenced book must exist.
pub fn save_review(conn: &Connection, review: &mut Review) -> Result<i64> {
    conn.execute(
        "INSERT INTO reviews (content, rating, book_id) VALUES (?1, ?2, ?3)",
        params![review.content(), review.rating(), review.book_id()],
    )
    .map_err(|err| map_foreign_key(err, review.book_id()))
    .context("failed to insert review")?;

    let id = conn.last_insert_rowid();
    review.assign_id(id);
    info!(
        "event=review_saved module=db id={id} book_id={}",
        review.book_id()
    );
    Ok(id)
}

/// Overwrite content, rating, and book of an already saved review. Moving a
/// review to a book that does not exist is rejected by the foreign key and
/// reported as [`ValidationError::UnknownBook`].
pub fn update_review(conn: &Connection, review: &Review) -> Result<()> {
    let id = review
        .id()
        .ok_or(ValidationError::MissingId("Review", "update"))?;

    let updated = conn
        .execute(
            "UPDATE reviews SET content = ?1, rating = ?2, book_id = ?3 WHERE id = ?4",
            params![review.content(), review.rating(), review.book_id(), id],
        )
        .map_err(|err| map_foreign_key(err, review.book_id()))
        .context("failed to update review")?;

    if updated == 0 {
        return Err(ValidationError::ReviewNotFound(id).into());
    }
    info!("event=review_updated module=db id={id}");
    Ok(())
}

/// Remove this review only; the parent book is untouched.
pub fn delete_review(conn: &Connection, review: &Review) -> Result<()> {
    let id = review
        .id()
        .ok_or(ValidationError::MissingId("Review", "delete"))?;

    let deleted = conn
        .execute("DELETE FROM reviews WHERE id = ?1", [id])
        .context("failed to delete review")?;

    if deleted == 0 {
        return Err(ValidationError::ReviewNotFound(id).into());
    }
    info!("event=review_deleted module=db id={id}");
    Ok(())
}

/// A foreign-key failure means the review points at a book that does not
/// exist; other constraint failures fall back to the generic mapping.
fn map_foreign_key(err: SqlError, book_id: i64) -> anyhow::Error {
    match &err {
        SqlError::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            ValidationError::UnknownBook(book_id).into()
        }
        _ => integrity_error(err),
    }
}

//! Persistence module split across logical submodules.

mod books;
mod connection;
mod reviews;
mod seed;
mod stats;

use rusqlite::{Error as SqlError, ErrorCode};

use crate::models::ValidationError;

pub use books::{
    count_books, delete_book, fetch_books, fetch_reviews_for_book, find_book_by_id,
    find_books_by_author, find_books_by_status, find_books_by_title, save_book, update_book,
};
pub use connection::{ensure_schema, open_db, open_db_in_memory};
pub use reviews::{
    count_reviews, delete_review, fetch_reviews, find_review_by_id, find_reviews_by_book,
    find_reviews_by_rating, save_review, update_review,
};
pub use seed::{load_or_seed_library, reset_and_seed_library, seed_sample_library};
pub use stats::{reading_stats, ReadingStats};

/// Coerce SQLite constraint errors into validation errors so the menu reports
/// them like any other bad input. Anything else passes through untouched.
pub(crate) fn integrity_error(err: SqlError) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        ValidationError::Integrity(err.to_string()).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookStatus};

    #[test]
    fn constraint_violation_on_write_becomes_integrity_error() {
        let conn = open_db_in_memory().unwrap();
        conn.execute("CREATE UNIQUE INDEX uniq_books_title ON books(title)", [])
            .unwrap();

        let mut first = Book::new("Dune", "Frank Herbert", None, BookStatus::Reading).unwrap();
        save_book(&conn, &mut first).unwrap();

        let mut second = Book::new("Dune", "Someone Else", None, BookStatus::Reading).unwrap();
        let err = save_book(&conn, &mut second).unwrap_err();

        match err.downcast_ref::<ValidationError>() {
            Some(ValidationError::Integrity(message)) => {
                assert!(message.contains("UNIQUE constraint failed"), "{message}");
            }
            other => panic!("expected an integrity error, got {other:?}"),
        }
        assert_eq!(second.id(), None);
        assert_eq!(count_books(&conn).unwrap(), 1);
    }

    #[test]
    fn non_constraint_errors_pass_through() {
        let err = integrity_error(SqlError::QueryReturnedNoRows);
        assert!(err.downcast_ref::<ValidationError>().is_none());
        assert!(err.downcast_ref::<SqlError>().is_some());
    }
}

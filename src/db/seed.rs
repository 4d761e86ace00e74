use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;

use super::books::{count_books, fetch_books, save_book};
use super::reviews::save_review;
use crate::models::{Book, BookStatus, Review};

const SAMPLE_BOOKS: &[(&str, &str, &str, BookStatus)] = &[
    ("The Great Gatsby", "F. Scott Fitzgerald", "Classic", BookStatus::Completed),
    ("Dune", "Frank Herbert", "Science Fiction", BookStatus::Reading),
    ("To Kill a Mockingbird", "Harper Lee", "Classic", BookStatus::Completed),
    ("Project Hail Mary", "Andy Weir", "Science Fiction", BookStatus::WantToRead),
    ("1984", "George Orwell", "Dystopian", BookStatus::Completed),
];

/// Reviews keyed by the index of the book they belong to in `SAMPLE_BOOKS`.
const SAMPLE_REVIEWS: &[(usize, &str, i64)] = &[
    (0, "A masterpiece of American literature", 5),
    (0, "Complex characters and beautiful prose", 4),
    (1, "Epic sci-fi world building", 5),
    (2, "A powerful story about justice and morality", 5),
    (4, "Thought-provoking and brilliantly written", 4),
];

/// Insert the sample library in one transaction and return the new books.
/// Existing rows are left alone, so calling this twice doubles the library.
pub fn seed_sample_library(conn: &Connection) -> Result<Vec<Book>> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start seed transaction")?;
    let books = insert_samples(&tx)?;
    tx.commit().context("failed to commit seed data")?;
    Ok(books)
}

/// Empty both tables and load the sample library in their place. The wipe
/// and the inserts share one transaction, so a failed seed leaves the old
/// data untouched.
pub fn reset_and_seed_library(conn: &Connection) -> Result<Vec<Book>> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start reseed transaction")?;
    let reviews_removed = tx
        .execute("DELETE FROM reviews", [])
        .context("failed to clear reviews")?;
    let books_removed = tx
        .execute("DELETE FROM books", [])
        .context("failed to clear books")?;
    info!(
        "event=reset module=db status=ok books_removed={books_removed} reviews_removed={reviews_removed}"
    );

    let books = insert_samples(&tx)?;
    tx.commit().context("failed to commit reseed")?;
    Ok(books)
}

fn insert_samples(conn: &Connection) -> Result<Vec<Book>> {
    let mut books = Vec::with_capacity(SAMPLE_BOOKS.len());
    for &(title, author, genre, status) in SAMPLE_BOOKS {
        let mut book = Book::new(title, author, Some(genre), status)?;
        save_book(conn, &mut book)?;
        books.push(book);
    }

    for &(index, content, rating) in SAMPLE_REVIEWS {
        let book_id = books[index]
            .id()
            .context("seeded book is missing its id")?;
        let mut review = Review::new(content, rating, book_id)?;
        save_review(conn, &mut review)?;
    }

    info!(
        "event=seed module=db status=ok books={} reviews={}",
        books.len(),
        SAMPLE_REVIEWS.len()
    );
    Ok(books)
}

/// Load existing books or seed the sample library when the table is empty,
/// so a first run has something to browse.
pub fn load_or_seed_library(conn: &Connection) -> Result<Vec<Book>> {
    if count_books(conn)? == 0 {
        seed_sample_library(conn)
    } else {
        fetch_books(conn)
    }
}

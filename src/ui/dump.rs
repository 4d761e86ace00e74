use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use rusqlite::Connection;

use crate::db::{fetch_books, fetch_reviews};

/// Print every book, every review with the title of its book, and a review
/// count per book. Meant for eyeballing the store, not for the menu.
pub fn dump_library(conn: &Connection, out: &mut impl Write) -> Result<()> {
    let books = fetch_books(conn)?;
    let reviews = fetch_reviews(conn)?;

    let titles: HashMap<i64, &str> = books
        .iter()
        .filter_map(|book| book.id().map(|id| (id, book.title())))
        .collect();
    let mut per_book: HashMap<i64, usize> = HashMap::new();
    for review in &reviews {
        *per_book.entry(review.book_id()).or_default() += 1;
    }

    writeln!(out, "🔍 DEBUG DATABASE CONTENTS")?;
    writeln!(out, "{}", "=".repeat(50))?;

    writeln!(out, "\nBOOKS ({} total):", books.len())?;
    for book in &books {
        writeln!(
            out,
            "  {}: {} by {} | {}",
            book.id().unwrap_or_default(),
            book.title(),
            book.author(),
            book.status()
        )?;
    }

    writeln!(out, "\nREVIEWS ({} total):", reviews.len())?;
    for review in &reviews {
        let title = titles.get(&review.book_id()).copied().unwrap_or("Unknown");
        writeln!(
            out,
            "  {}: ⭐{} for '{}' - '{}'",
            review.id().unwrap_or_default(),
            review.rating(),
            title,
            review.content()
        )?;
    }

    writeln!(out, "\nBOOK-REVIEW RELATIONSHIPS:")?;
    for book in &books {
        let count = book
            .id()
            .and_then(|id| per_book.get(&id))
            .copied()
            .unwrap_or(0);
        writeln!(out, "  '{}': {} reviews", book.title(), count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_db_in_memory, save_book, seed_sample_library};
    use crate::models::{Book, BookStatus};

    #[test]
    fn dump_lists_books_reviews_and_counts() {
        let conn = open_db_in_memory().unwrap();
        seed_sample_library(&conn).unwrap();

        let mut out = Vec::new();
        dump_library(&conn, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("BOOKS (5 total):"));
        assert!(text.contains("  2: Dune by Frank Herbert | reading"));
        assert!(text.contains("REVIEWS (5 total):"));
        assert!(text.contains("  3: ⭐5 for 'Dune' - 'Epic sci-fi world building'"));
        assert!(text.contains("  'The Great Gatsby': 2 reviews"));
        assert!(text.contains("  'Project Hail Mary': 0 reviews"));
    }

    #[test]
    fn dump_of_empty_store_still_prints_sections() {
        let conn = open_db_in_memory().unwrap();
        let mut book = Book::new("Alone", "Nobody", None, BookStatus::WantToRead).unwrap();
        save_book(&conn, &mut book).unwrap();

        let mut out = Vec::new();
        dump_library(&conn, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("REVIEWS (0 total):"));
        assert!(text.contains("  'Alone': 0 reviews"));
    }
}

use std::collections::BTreeMap;

use anyhow::Result;
use rusqlite::Connection;

use super::books::fetch_books;
use super::reviews::fetch_reviews;
use crate::models::{Book, BookStatus};

/// Aggregate counts over the whole library.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingStats {
    /// Every book in the library regardless of status.
    pub total_books: usize,
    pub completed: usize,
    pub reading: usize,
    pub want_to_read: usize,
    pub total_reviews: usize,
    /// Mean rating across all reviews; `None` when there are no reviews.
    pub average_rating: Option<f64>,
    /// Review count shared by every entry in `most_reviewed`.
    pub max_review_count: usize,
    /// Every book tied for the highest review count, in id order.
    pub most_reviewed: Vec<Book>,
}

impl ReadingStats {
    pub fn count_for(&self, status: BookStatus) -> usize {
        match status {
            BookStatus::WantToRead => self.want_to_read,
            BookStatus::Reading => self.reading,
            BookStatus::Completed => self.completed,
        }
    }
}

/// Gather everything the statistics screen shows. Both tables are loaded in
/// full and counted in memory. `average_rating` is `None` when there are no
/// reviews, and `most_reviewed` holds every book tied for the top count.
pub fn reading_stats(conn: &Connection) -> Result<ReadingStats> {
    let books = fetch_books(conn)?;
    let reviews = fetch_reviews(conn)?;

    let count = |status: BookStatus| books.iter().filter(|b| b.status() == status).count();

    let average_rating = if reviews.is_empty() {
        None
    } else {
        let sum: i64 = reviews.iter().map(|r| r.rating()).sum();
        Some(sum as f64 / reviews.len() as f64)
    };

    let mut per_book: BTreeMap<i64, usize> = BTreeMap::new();
    for review in &reviews {
        *per_book.entry(review.book_id()).or_default() += 1;
    }
    let max_review_count = per_book.values().copied().max().unwrap_or(0);
    let most_reviewed = books
        .iter()
        .filter(|book| {
            max_review_count > 0
                && book
                    .id()
                    .and_then(|id| per_book.get(&id))
                    .is_some_and(|&n| n == max_review_count)
        })
        .cloned()
        .collect();

    Ok(ReadingStats {
        total_books: books.len(),
        completed: count(BookStatus::Completed),
        reading: count(BookStatus::Reading),
        want_to_read: count(BookStatus::WantToRead),
        total_reviews: reviews.len(),
        average_rating,
        max_review_count,
        most_reviewed,
    })
}

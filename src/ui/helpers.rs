use anyhow::Error;

use crate::models::{Book, Review};

/// Width of the rule printed under book listing headers.
const BOOK_RULE_WIDTH: usize = 60;
/// Width of the rule printed under review listing headers.
const REVIEW_RULE_WIDTH: usize = 50;

/// Mean of the given ratings, or `None` for an empty slice.
pub(crate) fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(Review::rating).sum();
    Some(sum as f64 / reviews.len() as f64)
}

/// Round to one decimal for display, e.g. `4.666..` becomes `4.7`.
pub(crate) fn format_rating(average: f64) -> String {
    format!("{average:.1}")
}

/// Header plus rule shown above a non-empty listing.
pub(crate) fn listing_header(icon: &str, title: &str, count: usize, book_list: bool) -> String {
    let width = if book_list {
        BOOK_RULE_WIDTH
    } else {
        REVIEW_RULE_WIDTH
    };
    format!("\n{icon} {title} ({count} found)\n{}", "-".repeat(width))
}

/// Message shown in place of an empty listing.
pub(crate) fn empty_listing(title: &str) -> String {
    format!("No {} found.", title.to_lowercase())
}

/// Lines describing one book, including a review summary when it has any.
pub(crate) fn book_lines(book: &Book, reviews: &[Review]) -> Vec<String> {
    let status = book.status();
    let mut lines = vec![
        format!(
            "{}. {} {} by {}",
            book.id().unwrap_or_default(),
            status.icon(),
            book.title(),
            book.author()
        ),
        format!(
            "   Genre: {} | Status: {}",
            book.genre().unwrap_or("Not specified"),
            status.label()
        ),
    ];
    if let Some(average) = average_rating(reviews) {
        lines.push(format!(
            "   Reviews: {} | Avg Rating: {} ⭐",
            reviews.len(),
            format_rating(average)
        ));
    }
    lines
}

/// Lines describing one review; `book_title` is `None` when the parent book
/// could not be loaded.
pub(crate) fn review_lines(review: &Review, book_title: Option<&str>) -> Vec<String> {
    vec![
        format!(
            "{}. ⭐ {}/5 - {}",
            review.id().unwrap_or_default(),
            review.rating(),
            book_title.unwrap_or("Unknown Book")
        ),
        format!("   {}", review.content()),
    ]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

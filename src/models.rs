//! Domain models that mirror the SQLite schema. Construction and every setter
//! validate immediately, so a `Book` or `Review` that exists in memory always
//! satisfies its field rules and can be written without further checks.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// Rule violations raised before any store access, plus store integrity
/// failures re-raised so the menu can report both the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Title cannot exceed 100 characters")]
    TitleTooLong,
    #[error("Author cannot be empty")]
    EmptyAuthor,
    #[error("Author name cannot exceed 50 characters")]
    AuthorTooLong,
    #[error("Status must be one of: want_to_read, reading, completed (got `{0}`)")]
    UnknownStatus(String),
    #[error("Review content cannot be empty")]
    EmptyContent,
    #[error("Review content cannot exceed 500 characters")]
    ContentTooLong,
    #[error("Please enter a valid number")]
    RatingNotANumber,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("Review must be associated with a book")]
    MissingBookId,
    #[error("{0} must have an ID to {1}")]
    MissingId(&'static str, &'static str),
    #[error("Book {0} not found")]
    BookNotFound(i64),
    #[error("Review {0} not found")]
    ReviewNotFound(i64),
    #[error("Book {0} does not exist; reviews must reference an existing book")]
    UnknownBook(i64),
    #[error("Database error: {0}")]
    Integrity(String),
}

/// Reading progress for a book. Stored as snake_case text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookStatus {
    #[default]
    WantToRead,
    Reading,
    Completed,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [
        BookStatus::WantToRead,
        BookStatus::Reading,
        BookStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::WantToRead => "want_to_read",
            BookStatus::Reading => "reading",
            BookStatus::Completed => "completed",
        }
    }

    /// Title-cased label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::WantToRead => "Want To Read",
            BookStatus::Reading => "Reading",
            BookStatus::Completed => "Completed",
        }
    }

    /// Wording used by the status picker.
    pub fn menu_label(self) -> &'static str {
        match self {
            BookStatus::WantToRead => "Want to read",
            BookStatus::Reading => "Currently reading",
            BookStatus::Completed => "Completed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BookStatus::WantToRead => "📚",
            BookStatus::Reading => "🔖",
            BookStatus::Completed => "✅",
        }
    }

    /// Map the status picker's `1`-`3` choices onto a status.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(BookStatus::WantToRead),
            "2" => Some(BookStatus::Reading),
            "3" => Some(BookStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "want_to_read" => Ok(BookStatus::WantToRead),
            "reading" => Ok(BookStatus::Reading),
            "completed" => Ok(BookStatus::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// A book in the collection. `id` stays `None` until the row is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Primary key assigned by SQLite on insert. `None` marks a book that has
    /// never been saved, which is why update and delete refuse to run on it.
    id: Option<i64>,
    /// Trimmed, 1-100 characters.
    title: String,
    /// Trimmed, 1-50 characters.
    author: String,
    /// Free-form and optional. Blank input is stored as `NULL` so listings
    /// can fall back to "Not specified".
    genre: Option<String>,
    /// Reading progress; the only field the menu lets users change later.
    status: BookStatus,
}

impl Book {
    /// Validate and trim every field. Nothing touches the store until
    /// [`crate::db::save_book`] is called.
    pub fn new(
        title: &str,
        author: &str,
        genre: Option<&str>,
        status: BookStatus,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            title: validate_title(title)?,
            author: validate_author(author)?,
            genre: normalize_genre(genre),
            status,
        })
    }

    /// Rebuild a book from a stored row. Rows were validated on the way in,
    /// so the persistence layer hydrates them directly.
    pub(crate) fn from_row(
        id: i64,
        title: String,
        author: String,
        genre: Option<String>,
        status: BookStatus,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            author,
            genre,
            status,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate_title(title)?;
        Ok(())
    }

    pub fn set_author(&mut self, author: &str) -> Result<(), ValidationError> {
        self.author = validate_author(author)?;
        Ok(())
    }

    pub fn set_genre(&mut self, genre: Option<&str>) {
        self.genre = normalize_genre(genre);
    }

    pub fn set_status(&mut self, status: BookStatus) {
        self.status = status;
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

/// A rated review attached to exactly one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Primary key assigned by SQLite on insert; `None` until saved.
    id: Option<i64>,
    /// Trimmed review text, 1-500 characters.
    content: String,
    /// Star rating between [`RATING_MIN`] and [`RATING_MAX`] inclusive.
    rating: i64,
    /// Owning book. Only checked for being positive here; the store's foreign
    /// key rejects ids of books that do not exist.
    book_id: i64,
}

impl Review {
    /// Validate a review before it is saved. The book is not looked up here.
    pub fn new(content: &str, rating: i64, book_id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            content: validate_content(content)?,
            rating: validate_rating(rating)?,
            book_id: validate_book_id(book_id)?,
        })
    }

    pub(crate) fn from_row(id: i64, content: String, rating: i64, book_id: i64) -> Self {
        Self {
            id: Some(id),
            content,
            rating,
            book_id,
        }
    }

    /// Parse user text into a rating. Text that is not a whole number and a
    /// number outside the allowed range fail with different errors so the
    /// prompt can tell the user which mistake they made.
    pub fn parse_rating(raw: &str) -> Result<i64, ValidationError> {
        let rating = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::RatingNotANumber)?;
        validate_rating(rating)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn book_id(&self) -> i64 {
        self.book_id
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), ValidationError> {
        self.content = validate_content(content)?;
        Ok(())
    }

    pub fn set_rating(&mut self, rating: i64) -> Result<(), ValidationError> {
        self.rating = validate_rating(rating)?;
        Ok(())
    }

    pub fn set_book_id(&mut self, book_id: i64) -> Result<(), ValidationError> {
        self.book_id = validate_book_id(book_id)?;
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    bounded_text(raw, TITLE_MAX_CHARS).map_err(|empty| {
        if empty {
            ValidationError::EmptyTitle
        } else {
            ValidationError::TitleTooLong
        }
    })
}

fn validate_author(raw: &str) -> Result<String, ValidationError> {
    bounded_text(raw, AUTHOR_MAX_CHARS).map_err(|empty| {
        if empty {
            ValidationError::EmptyAuthor
        } else {
            ValidationError::AuthorTooLong
        }
    })
}

fn validate_content(raw: &str) -> Result<String, ValidationError> {
    bounded_text(raw, CONTENT_MAX_CHARS).map_err(|empty| {
        if empty {
            ValidationError::EmptyContent
        } else {
            ValidationError::ContentTooLong
        }
    })
}

fn validate_rating(rating: i64) -> Result<i64, ValidationError> {
    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange)
    }
}

fn validate_book_id(book_id: i64) -> Result<i64, ValidationError> {
    if book_id > 0 {
        Ok(book_id)
    } else {
        Err(ValidationError::MissingBookId)
    }
}

/// Trim and length-check a required text field. `Err(true)` means the value
/// was blank, `Err(false)` that it exceeded `max` characters.
fn bounded_text(raw: &str, max: usize) -> Result<String, bool> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(true);
    }
    if trimmed.chars().count() > max {
        return Err(false);
    }
    Ok(trimmed.to_string())
}

fn normalize_genre(genre: Option<&str>) -> Option<String> {
    genre
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

//! Line-oriented prompts. Each `prompt_*` helper keeps asking until it gets a
//! usable value; the only way out besides a valid answer is the input stream
//! closing, which surfaces as [`InputClosed`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::db::{find_book_by_id, find_review_by_id};
use crate::models::{Book, BookStatus, Review};

use super::app::{App, InputClosed, StatusKind};

impl<R: BufRead, W: Write> App<R, W> {
    /// Print `prompt`, then read one line with surrounding whitespace removed.
    pub(crate) fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    pub(crate) fn prompt_rating(&mut self) -> Result<i64> {
        loop {
            let raw = self.read_line("Enter rating (1-5): ")?;
            match Review::parse_rating(&raw) {
                Ok(rating) => return Ok(rating),
                Err(err) => self.status(StatusKind::Error, &err.to_string())?,
            }
        }
    }

    /// Ask for a book id until it names a stored book, and return that book.
    pub(crate) fn prompt_book(&mut self) -> Result<Book> {
        loop {
            let Some(id) = self.prompt_id("Enter book ID: ")? else {
                continue;
            };
            match find_book_by_id(&self.conn, id)? {
                Some(book) => return Ok(book),
                None => self.status(
                    StatusKind::Error,
                    "Book not found. Please enter a valid book ID.",
                )?,
            }
        }
    }

    /// Ask for a review id until it names a stored review, and return it.
    pub(crate) fn prompt_review(&mut self) -> Result<Review> {
        loop {
            let Some(id) = self.prompt_id("Enter review ID: ")? else {
                continue;
            };
            match find_review_by_id(&self.conn, id)? {
                Some(review) => return Ok(review),
                None => self.status(
                    StatusKind::Error,
                    "Review not found. Please enter a valid review ID.",
                )?,
            }
        }
    }

    pub(crate) fn prompt_status(&mut self) -> Result<BookStatus> {
        writeln!(self.out, "\nReading Status:")?;
        for (index, status) in BookStatus::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {}", index + 1, status.menu_label())?;
        }

        loop {
            let choice = self.read_line("Choose status (1-3): ")?;
            match BookStatus::from_choice(&choice) {
                Some(status) => return Ok(status),
                None => self.status(
                    StatusKind::Error,
                    "Invalid choice. Please enter 1, 2, or 3.",
                )?,
            }
        }
    }

    /// `true` only for an explicit `y`/`Y`.
    pub(crate) fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.read_line(question)?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// One attempt at reading an integer id; `None` after a parse failure.
    fn prompt_id(&mut self, prompt: &str) -> Result<Option<i64>> {
        let raw = self.read_line(prompt)?;
        match raw.parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.status(StatusKind::Error, "Please enter a valid number")?;
                Ok(None)
            }
        }
    }
}

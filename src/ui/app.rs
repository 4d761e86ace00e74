use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use log::{info, warn};
use rusqlite::Connection;
use thiserror::Error;

use crate::db::{
    count_books, count_reviews, delete_book, delete_review, fetch_books, fetch_reviews,
    fetch_reviews_for_book, find_book_by_id, find_books_by_author, find_books_by_title,
    find_reviews_by_book, find_reviews_by_rating, reading_stats, save_book, save_review,
    update_book,
};
use crate::models::{Book, Review, ValidationError};

use super::helpers::{
    book_lines, empty_listing, format_rating, listing_header, review_lines, surface_error,
};
use super::menu::{render_menu, MenuAction};

/// Raised when the input stream ends while the app is waiting for a line.
#[derive(Debug, Error)]
#[error("input closed")]
pub struct InputClosed;

/// Severity levels for one-line status messages.
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn color(&self) -> Color {
        match self {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        }
    }
}

/// Menu loop state: the open connection plus the input and output streams.
pub struct App<R, W> {
    pub(super) conn: Connection,
    pub(super) input: R,
    pub(super) out: W,
    styled: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(conn: Connection, input: R, out: W) -> Self {
        Self {
            conn,
            input,
            out,
            styled: false,
        }
    }

    /// Color status messages. Only worth enabling when `out` is a terminal.
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Hand the connection back so the caller can close it explicitly.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Show the menu, dispatch choices, and repeat until the user exits or
    /// input runs out. A failed action is reported and the loop carries on.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "📚 Welcome to Your Personal Book Tracker!")?;

        loop {
            render_menu(&mut self.out)?;
            let choice = match self.read_line("Enter your choice (1-14): ") {
                Ok(choice) => choice,
                Err(err) if err.is::<InputClosed>() => break,
                Err(err) => return Err(err),
            };

            let Some(action) = MenuAction::parse(&choice) else {
                self.status(StatusKind::Error, "Invalid choice. Please try again.")?;
                continue;
            };
            if action == MenuAction::Exit {
                writeln!(self.out, "Happy reading! 📖")?;
                break;
            }

            info!("event=menu_action module=ui action={action:?}");
            if let Err(err) = self.dispatch(action) {
                if err.is::<InputClosed>() {
                    break;
                }
                self.report_error(&err)?;
            }
        }

        info!("event=app_exit module=ui status=ok");
        self.out.flush().context("failed to flush output")
    }

    fn dispatch(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::AddBook => self.add_book(),
            MenuAction::ViewBooks => self.view_books(),
            MenuAction::FindBookById => self.find_book_by_id(),
            MenuAction::FindBooksByTitle => self.find_books_by_title(),
            MenuAction::FindBooksByAuthor => self.find_books_by_author(),
            MenuAction::UpdateBookStatus => self.update_book_status(),
            MenuAction::DeleteBook => self.delete_book(),
            MenuAction::AddReview => self.add_review(),
            MenuAction::ViewReviews => self.view_reviews(),
            MenuAction::FindReviewsByBook => self.find_reviews_by_book(),
            MenuAction::FindReviewsByRating => self.find_reviews_by_rating(),
            MenuAction::DeleteReview => self.delete_review(),
            MenuAction::ViewStatistics => self.view_statistics(),
            MenuAction::Exit => Ok(()),
        }
    }

    /// Validation problems are the user's to fix; anything else is unexpected
    /// but still must not end the session.
    fn report_error(&mut self, err: &anyhow::Error) -> Result<()> {
        if let Some(validation) = err.downcast_ref::<ValidationError>() {
            let message = format!("❌ Error: {validation}");
            self.status(StatusKind::Error, &message)
        } else {
            warn!("event=action_failed module=ui error={err:#}");
            let message = format!("❌ An error occurred: {}", surface_error(err));
            self.status(StatusKind::Error, &message)
        }
    }

    pub(super) fn status(&mut self, kind: StatusKind, text: &str) -> Result<()> {
        if self.styled {
            queue!(
                self.out,
                SetForegroundColor(kind.color()),
                Print(text),
                ResetColor,
                Print("\n")
            )
            .context("failed to write status line")?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    /// Print a notice and report whether the books table has any rows, for
    /// actions that would otherwise prompt for an id that cannot exist.
    fn require_books(&mut self) -> Result<bool> {
        if count_books(&self.conn)? == 0 {
            writeln!(self.out, "No books in your collection yet.")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn require_reviews(&mut self) -> Result<bool> {
        if count_reviews(&self.conn)? == 0 {
            writeln!(self.out, "No reviews yet.")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn show_books(&mut self, books: &[Book], title: &str) -> Result<()> {
        if books.is_empty() {
            writeln!(self.out, "{}", empty_listing(title))?;
            return Ok(());
        }

        writeln!(self.out, "{}", listing_header("📖", title, books.len(), true))?;
        for book in books {
            let reviews = fetch_reviews_for_book(&self.conn, book)?;
            for line in book_lines(book, &reviews) {
                writeln!(self.out, "{line}")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn show_reviews(&mut self, reviews: &[Review], title: &str) -> Result<()> {
        if reviews.is_empty() {
            writeln!(self.out, "{}", empty_listing(title))?;
            return Ok(());
        }

        writeln!(self.out, "{}", listing_header("📝", title, reviews.len(), false))?;
        for review in reviews {
            let book = find_book_by_id(&self.conn, review.book_id())?;
            for line in review_lines(review, book.as_ref().map(Book::title)) {
                writeln!(self.out, "{line}")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn add_book(&mut self) -> Result<()> {
        writeln!(self.out, "\n➕ ADD NEW BOOK")?;
        let title = self.read_line("Book title: ")?;
        let author = self.read_line("Author: ")?;
        let genre = self.read_line("Genre (optional): ")?;
        let status = self.prompt_status()?;

        let mut book = Book::new(&title, &author, Some(&genre), status)?;
        let id = save_book(&self.conn, &mut book)?;
        let message = format!("✅ '{}' added successfully with ID: {id}", book.title());
        self.status(StatusKind::Info, &message)
    }

    fn view_books(&mut self) -> Result<()> {
        let books = fetch_books(&self.conn)?;
        self.show_books(&books, "ALL BOOKS")
    }

    fn find_book_by_id(&mut self) -> Result<()> {
        if !self.require_books()? {
            return Ok(());
        }
        let book = self.prompt_book()?;
        let id = book.id().unwrap_or_default();
        let reviews = fetch_reviews_for_book(&self.conn, &book)?;
        let reviews_title = format!("REVIEWS FOR '{}'", book.title());
        self.show_books(std::slice::from_ref(&book), &format!("BOOK #{id}"))?;
        self.show_reviews(&reviews, &reviews_title)
    }

    fn find_books_by_title(&mut self) -> Result<()> {
        let term = self.read_line("Enter title search term: ")?;
        let books = find_books_by_title(&self.conn, &term)?;
        self.show_books(&books, &format!("BOOKS WITH '{term}' IN TITLE"))
    }

    fn find_books_by_author(&mut self) -> Result<()> {
        let term = self.read_line("Enter author search term: ")?;
        let books = find_books_by_author(&self.conn, &term)?;
        self.show_books(&books, &format!("BOOKS BY '{term}'"))
    }

    fn update_book_status(&mut self) -> Result<()> {
        if !self.require_books()? {
            return Ok(());
        }
        self.view_books()?;
        let mut book = self.prompt_book()?;
        writeln!(self.out, "\nUpdating status for: {}", book.title())?;
        let status = self.prompt_status()?;
        book.set_status(status);
        update_book(&self.conn, &book)?;
        self.status(StatusKind::Info, "✅ Status updated successfully!")
    }

    fn delete_book(&mut self) -> Result<()> {
        if !self.require_books()? {
            return Ok(());
        }
        self.view_books()?;
        let book = self.prompt_book()?;
        let question = format!(
            "Are you sure you want to delete '{}' and all its reviews? (y/n): ",
            book.title()
        );
        if !self.confirm(&question)? {
            writeln!(self.out, "Deletion cancelled.")?;
            return Ok(());
        }

        let removed = delete_book(&self.conn, &book)?;
        let message = format!("✅ Book and {removed} associated review(s) deleted successfully!");
        self.status(StatusKind::Info, &message)
    }

    fn add_review(&mut self) -> Result<()> {
        if !self.require_books()? {
            return Ok(());
        }
        self.view_books()?;
        let book = self.prompt_book()?;
        writeln!(self.out, "\nAdding review for: {}", book.title())?;
        let content = self.read_line("Enter your review: ")?;
        let rating = self.prompt_rating()?;

        let book_id = book
            .id()
            .ok_or(ValidationError::MissingBookId)?;
        let mut review = Review::new(&content, rating, book_id)?;
        save_review(&self.conn, &mut review)?;
        self.status(StatusKind::Info, "✅ Review added successfully!")
    }

    fn view_reviews(&mut self) -> Result<()> {
        let reviews = fetch_reviews(&self.conn)?;
        self.show_reviews(&reviews, "ALL REVIEWS")
    }

    fn find_reviews_by_book(&mut self) -> Result<()> {
        if !self.require_books()? {
            return Ok(());
        }
        self.view_books()?;
        let book = self.prompt_book()?;
        let reviews = find_reviews_by_book(&self.conn, book.id().unwrap_or_default())?;
        self.show_reviews(&reviews, &format!("REVIEWS FOR '{}'", book.title()))
    }

    fn find_reviews_by_rating(&mut self) -> Result<()> {
        let rating = self.prompt_rating()?;
        let reviews = find_reviews_by_rating(&self.conn, rating)?;
        self.show_reviews(&reviews, &format!("REVIEWS WITH {rating} STARS"))
    }

    fn delete_review(&mut self) -> Result<()> {
        self.view_reviews()?;
        if !self.require_reviews()? {
            return Ok(());
        }
        let review = self.prompt_review()?;
        let book_title = find_book_by_id(&self.conn, review.book_id())?
            .map(|book| book.title().to_string())
            .unwrap_or_else(|| "Unknown Book".to_string());
        let question =
            format!("Are you sure you want to delete this review for '{book_title}'? (y/n): ");
        if !self.confirm(&question)? {
            writeln!(self.out, "Deletion cancelled.")?;
            return Ok(());
        }

        delete_review(&self.conn, &review)?;
        self.status(StatusKind::Info, "✅ Review deleted successfully!")
    }

    fn view_statistics(&mut self) -> Result<()> {
        let stats = reading_stats(&self.conn)?;
        if stats.total_books == 0 {
            writeln!(self.out, "No books in your collection yet.")?;
            return Ok(());
        }

        writeln!(self.out, "\n📊 READING STATISTICS")?;
        writeln!(self.out, "{}", "=".repeat(30))?;
        writeln!(self.out, "Total books: {}", stats.total_books)?;
        writeln!(self.out, "Completed: {}", stats.completed)?;
        writeln!(self.out, "Currently reading: {}", stats.reading)?;
        writeln!(self.out, "Want to read: {}", stats.want_to_read)?;
        writeln!(self.out, "Total reviews: {}", stats.total_reviews)?;
        if let Some(average) = stats.average_rating {
            writeln!(self.out, "Average rating: {} ⭐", format_rating(average))?;
        }

        if !stats.most_reviewed.is_empty() {
            writeln!(
                self.out,
                "\nMost reviewed book(s) ({} reviews):",
                stats.max_review_count
            )?;
            for book in &stats.most_reviewed {
                writeln!(self.out, "  - {}", book.title())?;
            }
        }
        Ok(())
    }
}

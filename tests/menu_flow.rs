use book_tracker::db::{fetch_books, find_review_by_id, open_db_in_memory, save_book};
use book_tracker::{App, Book, BookStatus};
use rusqlite::Connection;

/// Run the menu against `script` and return the connection plus everything
/// the app printed.
fn run_script(conn: Connection, script: &str) -> (Connection, String) {
    let mut out = Vec::new();
    let mut app = App::new(conn, script.as_bytes(), &mut out);
    app.run().unwrap();
    let conn = app.into_connection();
    (conn, String::from_utf8(out).unwrap())
}

#[test]
fn add_book_review_then_delete_cascades() {
    let conn = open_db_in_memory().unwrap();
    let script = [
        "1",
        "Dune",
        "Frank Herbert",
        "Science Fiction",
        "2",
        "8",
        "1",
        "Great worldbuilding",
        "5",
        "10",
        "1",
        "7",
        "1",
        "y",
        "14",
    ]
    .join("\n");

    let (conn, output) = run_script(conn, &script);

    assert!(output.contains("'Dune' added successfully with ID: 1"));
    assert!(output.contains("Review added successfully!"));
    assert!(output.contains("REVIEWS FOR 'Dune' (1 found)"));
    assert!(output.contains("1. ⭐ 5/5 - Dune"));
    assert!(output.contains("Book and 1 associated review(s) deleted successfully!"));
    assert!(output.contains("Happy reading!"));
    assert!(fetch_books(&conn).unwrap().is_empty());
    assert_eq!(find_review_by_id(&conn, 1).unwrap(), None);
}

#[test]
fn invalid_choice_and_validation_errors_keep_the_loop_alive() {
    let conn = open_db_in_memory().unwrap();
    let script = ["99", "1", "   ", "Author", "", "1", "2", "14"].join("\n");

    let (_conn, output) = run_script(conn, &script);

    assert!(output.contains("Invalid choice. Please try again."));
    assert!(output.contains("❌ Error: Title cannot be empty"));
    assert!(output.contains("No all books found."));
    assert!(output.contains("Happy reading!"));
}

#[test]
fn prompts_retry_until_valid() {
    let conn = open_db_in_memory().unwrap();
    let mut book = Book::new("Dune", "Frank Herbert", None, BookStatus::Reading).unwrap();
    save_book(&conn, &mut book).unwrap();

    let script = [
        "8", "abc", "42", "1", "Loved it", "0", "five", "4", "6", "1", "7", "3", "14",
    ]
    .join("\n");

    let (conn, output) = run_script(conn, &script);

    // "abc" for the book id and "five" for the rating.
    assert_eq!(output.matches("Please enter a valid number").count(), 2);
    assert!(output.contains("Book not found. Please enter a valid book ID."));
    // "0" and "6" are numbers, just out of range.
    assert_eq!(output.matches("Rating must be between 1 and 5").count(), 2);
    assert!(output.contains("Review added successfully!"));
    assert!(output.contains("Invalid choice. Please enter 1, 2, or 3."));
    assert!(output.contains("Status updated successfully!"));

    let stored = fetch_books(&conn).unwrap();
    assert_eq!(stored[0].status(), BookStatus::Completed);
}

#[test]
fn statistics_and_searches_render() {
    let conn = open_db_in_memory().unwrap();
    book_tracker::db::seed_sample_library(&conn).unwrap();
    let script = ["4", "great", "5", "xyz", "11", "5", "13", "14"].join("\n");

    let (_conn, output) = run_script(conn, &script);

    assert!(output.contains("BOOKS WITH 'great' IN TITLE (1 found)"));
    assert!(output.contains("The Great Gatsby by F. Scott Fitzgerald"));
    assert!(output.contains("Reviews: 2 | Avg Rating: 4.5 ⭐"));
    assert!(output.contains("No books by 'xyz' found."));
    assert!(output.contains("REVIEWS WITH 5 STARS (3 found)"));
    assert!(output.contains("Total books: 5"));
    assert!(output.contains("Completed: 3"));
    assert!(output.contains("Average rating: 4.6 ⭐"));
    assert!(output.contains("Most reviewed book(s) (2 reviews):"));
    assert!(output.contains("  - The Great Gatsby"));
}

#[test]
fn declining_confirmation_keeps_the_review() {
    let conn = open_db_in_memory().unwrap();
    book_tracker::db::seed_sample_library(&conn).unwrap();
    let script = ["12", "1", "n", "14"].join("\n");

    let (conn, output) = run_script(conn, &script);

    assert!(output.contains("Deletion cancelled."));
    assert!(find_review_by_id(&conn, 1).unwrap().is_some());
}

#[test]
fn empty_library_short_circuits_id_prompts() {
    let conn = open_db_in_memory().unwrap();
    let script = ["3", "12", "13", "14"].join("\n");

    let (_conn, output) = run_script(conn, &script);

    assert!(output.contains("No books in your collection yet."));
    assert!(output.contains("No reviews yet."));
    assert!(!output.contains("Enter book ID"));
}

#[test]
fn book_id_actions_on_empty_library_print_one_notice() {
    let conn = open_db_in_memory().unwrap();
    let script = ["6", "7", "8", "10", "14"].join("\n");

    let (_conn, output) = run_script(conn, &script);

    assert_eq!(output.matches("No books in your collection yet.").count(), 4);
    assert!(!output.contains("No all books found."));
    assert!(!output.contains("Enter book ID"));
    assert!(output.contains("Happy reading!"));
}

#[test]
fn closed_input_ends_the_session_mid_prompt() {
    let conn = open_db_in_memory().unwrap();
    let (_conn, output) = run_script(conn, "1\nDune\n");

    assert!(output.contains("Author: "));
    assert!(!output.contains("Happy reading!"));
}

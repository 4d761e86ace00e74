use book_tracker::db::{
    count_reviews, fetch_books, find_reviews_by_book, load_or_seed_library, open_db,
    reset_and_seed_library, save_book, seed_sample_library,
};
use book_tracker::{Book, BookStatus};

#[test]
fn first_load_seeds_and_later_loads_do_not() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.sqlite");

    {
        let conn = open_db(&path).unwrap();
        let books = load_or_seed_library(&conn).unwrap();
        assert_eq!(books.len(), 5);
        assert_eq!(count_reviews(&conn).unwrap(), 5);
    }

    let conn = open_db(&path).unwrap();
    let books = load_or_seed_library(&conn).unwrap();
    assert_eq!(books.len(), 5);
    assert_eq!(books[1].title(), "Dune");
    assert_eq!(books[1].status(), BookStatus::Reading);
    assert_eq!(count_reviews(&conn).unwrap(), 5);
}

#[test]
fn reseed_replaces_existing_rows() {
    let conn = book_tracker::open_db_in_memory().unwrap();
    seed_sample_library(&conn).unwrap();
    let mut extra = Book::new("Extra", "Reader", None, BookStatus::Reading).unwrap();
    save_book(&conn, &mut extra).unwrap();

    let books = reset_and_seed_library(&conn).unwrap();
    assert_eq!(books.len(), 5);

    let stored = fetch_books(&conn).unwrap();
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|book| book.title() != "Extra"));
    assert_eq!(count_reviews(&conn).unwrap(), 5);

    reset_and_seed_library(&conn).unwrap();
    assert_eq!(fetch_books(&conn).unwrap().len(), 5);
    assert_eq!(count_reviews(&conn).unwrap(), 5);
}

#[test]
fn reseed_keeps_every_review_attached_to_a_seeded_book() {
    let conn = book_tracker::open_db_in_memory().unwrap();
    let books = reset_and_seed_library(&conn).unwrap();
    let gatsby = &books[0];

    let reviews = find_reviews_by_book(&conn, gatsby.id().unwrap()).unwrap();
    assert_eq!(reviews.len(), 2);
}

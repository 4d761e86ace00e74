//! Wipe the tracker's database and reload the sample library.
use book_tracker::{open_db, reset_and_seed_library, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::from_home()?;
    let conn = open_db(&config.db_path)?;
    let books = reset_and_seed_library(&conn)?;

    println!("Database seeded successfully!");
    println!("Created {} books at {}", books.len(), config.db_path.display());
    Ok(())
}

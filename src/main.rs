//! Binary entry point: resolve the data directory, start file logging, open
//! the database, and hand control to the menu loop until the user exits.
use book_tracker::{init_logging, load_or_seed_library, open_db, run_app, Config};
use log::info;

fn main() -> anyhow::Result<()> {
    let config = Config::from_home()?;

    // Logging is best effort; the tracker works without it.
    let _logger = match init_logging(config.log_level, &config.log_dir) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("warning: file logging disabled: {err:#}");
            None
        }
    };

    let conn = open_db(&config.db_path)?;
    let books = load_or_seed_library(&conn)?;
    info!("event=library_loaded module=core books={}", books.len());

    run_app(conn)
}

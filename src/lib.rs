//! Core library surface for the book tracker.
//!
//! The binary only wires these pieces together; tests drive the same API
//! against in-memory databases and scripted input.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` at startup.
pub use db::{load_or_seed_library, open_db, open_db_in_memory, reset_and_seed_library};

/// The two primary domain types that other layers manipulate.
pub use models::{Book, BookStatus, Review, ValidationError};

pub use config::Config;
pub use logging::init_logging;
pub use ui::{dump_library, run_app, App, MenuAction};

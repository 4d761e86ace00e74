//! Numbered text menu over the book and review store.

mod app;
mod dump;
mod forms;
mod helpers;
mod menu;
mod terminal;

pub use app::{App, InputClosed};
pub use dump::dump_library;
pub use menu::{render_menu, MenuAction};
pub use terminal::run_app;

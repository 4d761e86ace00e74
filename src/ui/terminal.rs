use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;

use super::app::App;

/// Drive the menu on stdin/stdout until the user exits, then close the
/// database explicitly so a failed close is reported rather than ignored.
pub fn run_app(conn: Connection) -> Result<()> {
    let stdout = io::stdout();
    let styled = stdout.is_terminal();

    let mut app = App::new(conn, io::stdin().lock(), stdout.lock()).with_styling(styled);
    let result = app.run();

    app.into_connection()
        .close()
        .map_err(|(_, err)| err)
        .context("failed to close database")?;
    info!("event=db_close module=db status=ok");
    result
}

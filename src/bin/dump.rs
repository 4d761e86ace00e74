//! Print the full contents of the tracker's database to stdout.
use std::io::{self, Write};

use book_tracker::{dump_library, open_db, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::from_home()?;
    let conn = open_db(&config.db_path)?;

    let mut out = io::stdout().lock();
    dump_library(&conn, &mut out)?;
    out.flush()?;
    Ok(())
}

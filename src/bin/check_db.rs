use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use rusqlite::{Connection, OpenFlags};

/// A utility for checking that the Budgie database can be opened and queried.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "BUDGIE_DB_PATH", default_value = "budgie.db")]
    db_path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match check(&args.db_path) {
        Ok(()) => {
            println!("Database connection OK: {}", args.db_path.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!(
                "Database connection FAILED for {}: {error}",
                args.db_path.display()
            );
            ExitCode::FAILURE
        }
    }
}

/// Open the existing database at `path` without creating it and run a trivial query.
fn check(path: &Path) -> Result<(), rusqlite::Error> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

    Ok(())
}

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use budgie::{
    Settings, initialize_db,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// A utility for creating a test database for the Budgie REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of sample transactions to create.
    #[arg(long, short, default_value_t = 3)]
    months: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(
        &conn,
        &Settings {
            username: "Test User".to_owned(),
            currency_symbol: "$".to_owned(),
            monthly_budget: 2500.0,
        },
    )?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for month in 0..args.months.max(0) {
        let month_start = today - Duration::days(30 * month);

        for (offset, kind, category, amount, note) in [
            (0, TransactionKind::Income, "Salary", 4200.0, Some("Monthly pay")),
            (1, TransactionKind::Expense, "Rent", 1650.0, None),
            (3, TransactionKind::Expense, "Groceries", 182.45, Some("Weekly shop")),
            (8, TransactionKind::Expense, "Transport", 60.0, Some("Bus pass")),
            (12, TransactionKind::Expense, "Groceries", 143.9, None),
            (17, TransactionKind::Income, "Freelance", 350.0, Some("Logo design")),
            (21, TransactionKind::Expense, "Dining Out", 48.5, Some("Dinner with friends")),
        ] {
            let transaction = NewTransaction {
                kind,
                category: category.to_owned(),
                amount,
                note: note.map(str::to_owned),
                transaction_date: month_start - Duration::days(offset),
            };

            create_transaction(&transaction, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

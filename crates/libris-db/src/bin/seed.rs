//! # Seed Data Generator
//!
//! Populates a database with sample books and members for development.
//!
//! ## Usage
//! ```bash
//! # 200 sample books and 50 members (default)
//! cargo run -p libris-db --bin seed
//!
//! # Custom amount
//! cargo run -p libris-db --bin seed -- --count 1000
//!
//! # Load the catalog from a JSON file instead of generating it
//! cargo run -p libris-db --bin seed -- --catalog ./catalog.json
//!
//! # Specify database path
//! cargo run -p libris-db --bin seed -- --db ./data/libris.db
//! ```
//!
//! A catalog file is a JSON array of `{ "title", "author", "copies" }`
//! objects; `copies` may be omitted.

use std::env;
use std::path::PathBuf;

use libris_core::{NewBook, NewMember};
use libris_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sample authors and their titles for generated catalogs.
const SHELVES: &[(&str, &[&str])] = &[
    (
        "Jane Austen",
        &["Pride and Prejudice", "Emma", "Persuasion", "Mansfield Park", "Sense and Sensibility"],
    ),
    (
        "Ursula K. Le Guin",
        &["A Wizard of Earthsea", "The Dispossessed", "The Left Hand of Darkness", "The Lathe of Heaven"],
    ),
    (
        "Chinua Achebe",
        &["Things Fall Apart", "No Longer at Ease", "Arrow of God", "Anthills of the Savannah"],
    ),
    (
        "Italo Calvino",
        &["Invisible Cities", "If on a winter's night a traveler", "The Baron in the Trees"],
    ),
    (
        "Toni Morrison",
        &["Beloved", "Song of Solomon", "Sula", "The Bluest Eye", "Jazz"],
    ),
    (
        "Stanislaw Lem",
        &["Solaris", "The Cyberiad", "His Master's Voice", "Fiasco"],
    ),
];

const EDITIONS: &[&str] = &["", " (Annotated)", " (Illustrated)", " (Student Edition)", " (Omnibus)"];

const GIVEN_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Edsger", "Barbara", "Donald", "Frances", "Ken", "Radia", "Niklaus",
];

const FAMILY_NAMES: &[&str] = &["Okafor", "Lindqvist", "Moreau", "Tanaka", "Rossi"];

struct Options {
    db_path: PathBuf,
    count: usize,
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let Some(options) = parse_args(env::args().skip(1).collect()) else {
        return Ok(());
    };

    println!("Libris Seed Data Generator");
    println!("==========================");
    println!("Database: {}", options.db_path.display());
    println!();

    let db = Database::new(DbConfig::new(&options.db_path)).await?;

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = match &options.catalog {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let books: Vec<NewBook> = serde_json::from_str(&raw)?;
            info!(path = %path.display(), books = books.len(), "Loaded catalog file");
            books
        }
        None => generate_catalog(options.count),
    };

    let start = std::time::Instant::now();
    let mut inserted = 0usize;

    for book in &catalog {
        if let Err(e) = libris_core::validation::validate_new_book(book) {
            warn!(title = %book.title, error = %e, "Skipping invalid catalog entry");
            continue;
        }

        match db.books().create(book).await {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to insert {}: {}", book.title, e),
        }
    }

    let member_count = (options.count / 4).max(1);
    for seed in 0..member_count {
        db.members().create(&generate_member(seed)).await?;
    }

    println!("Inserted {} books and {} members in {:?}", inserted, member_count, start.elapsed());

    let sample = db.books().search("earthsea").await?;
    println!("  Search 'earthsea': {} results", sample.len());

    db.close().await;
    println!("Seed complete!");

    Ok(())
}

/// Parses flags by hand. Returns `None` when only help was requested.
fn parse_args(args: Vec<String>) -> Option<Options> {
    let mut options = Options {
        db_path: PathBuf::from("./libris_dev.db"),
        count: 200,
        catalog: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    options.count = value.parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    options.db_path = PathBuf::from(value);
                    i += 1;
                }
            }
            "--catalog" => {
                if let Some(value) = args.get(i + 1) {
                    options.catalog = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Libris Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>         Number of books to generate (default: 200)");
                println!("  -d, --db <PATH>         Database file path (default: ./libris_dev.db)");
                println!("      --catalog <FILE>    Load books from a JSON array instead");
                println!("  -h, --help              Show this help message");
                return None;
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    Some(options)
}

/// Generates `count` books by cycling through shelves and editions.
fn generate_catalog(count: usize) -> Vec<NewBook> {
    let titles: Vec<(&str, &str)> = SHELVES
        .iter()
        .flat_map(|(author, titles)| titles.iter().map(move |title| (*author, *title)))
        .collect();

    (0..count)
        .map(|seed| {
            let (author, title) = titles[seed % titles.len()];
            let edition = EDITIONS[(seed / titles.len()) % EDITIONS.len()];
            let round = seed / (titles.len() * EDITIONS.len());
            let title = if round == 0 {
                format!("{}{}", title, edition)
            } else {
                format!("{}{} #{}", title, edition, round + 1)
            };
            let copies = 1 + (seed * 7 % 5) as i64;
            NewBook::new(title, author, copies)
        })
        .collect()
}

fn generate_member(seed: usize) -> NewMember {
    let given = GIVEN_NAMES[seed % GIVEN_NAMES.len()];
    let family = FAMILY_NAMES[(seed / GIVEN_NAMES.len()) % FAMILY_NAMES.len()];

    NewMember::new(format!("{} {}", given, family))
        .with_email(format!("{}.{}{}@members.libris.local", given, family, seed).to_lowercase())
        .with_roll_no(format!("LIB-{:05}", seed + 1))
}

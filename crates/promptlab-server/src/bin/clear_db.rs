//! Deletes every experiment row. Deletion order respects the foreign keys.

use anyhow::Result;
use clap::Parser;
use promptlab_core::storage::store::Store;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Clear all promptlab experiment tables")]
struct Args {
    /// SQLite database path (or set PROMPTLAB_DB)
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let db = args
        .db
        .or_else(|| std::env::var("PROMPTLAB_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("promptlab.db"));

    println!("Clearing database at {}...", db.display());

    let store = Store::open(&db)?;
    store.init_schema()?;
    store.clear_all()?;

    println!("Database cleared successfully!");
    Ok(())
}

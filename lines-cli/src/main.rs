//! Lines console game
//!
//! Move tokens along open paths, line up same-colored runs to clear
//! them and score, and keep the board from filling up.

use clap::Parser;
use lines_store::RecordsStore;
use std::path::PathBuf;

mod repl;

use repl::Session;

#[derive(Parser)]
#[command(name = "lines")]
#[command(about = "Lines console puzzle")]
struct Cli {
    /// Player name written into saves and the record table
    #[arg(long, default_value = "Player")]
    name: String,

    /// Board edge length (5 to 15)
    #[arg(long, default_value = "9")]
    size: i16,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Record table file
    #[arg(long, default_value = "records.json")]
    records: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if !(5..=15).contains(&cli.size) {
        anyhow::bail!("board size must be between 5 and 15");
    }

    let mut session = Session::new(&cli.name, cli.size, cli.seed, RecordsStore::new(cli.records));
    session.run()
}

use clap::{Parser, Subcommand};
use eyre::Result;
use std::path::{Path, PathBuf};
use tasknote::{Store, session};
use tracing::error;

#[derive(Parser)]
#[command(name = "tasknote")]
#[command(about = "Console note-taking backed by an embedded SQLite store")]
#[command(version)]
struct Cli {
    /// Path to the database file (default: tasknote.db next to the executable)
    #[arg(short, long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every note to stdout as JSON Lines
    Export,
}

/// Store initialization failure, distinct from the generic error exit.
const EXIT_STORE_INIT: i32 = 2;

fn main() -> Result<()> {
    // Diagnostics go to stderr so they never corrupt the menu
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let db_path = cli.db_path.unwrap_or_else(default_db_path);

    let mut store = match Store::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            error!(path = %db_path.display(), %err, "Failed to initialize store");
            eprintln!("Could not initialize the note store at {}", db_path.display());
            std::process::exit(EXIT_STORE_INIT);
        }
    };

    match cli.command {
        Some(Commands::Export) => export(&store),
        None => session::run(&mut store),
    }
}

fn export(store: &Store) -> Result<()> {
    for task in store.list()? {
        println!("{}", serde_json::to_string(&task)?);
    }
    Ok(())
}

fn default_db_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasknote.db")
}

mod config;
mod export;
mod interactive;
mod logging;
mod output;
mod parse;
mod prompt;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use mergerank_core::{DuplicatePolicy, Item, RankingSession, SessionConfig, TiePolicy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::interactive::{run_session, Outcome};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "mergerank", version, about = "Rank items by answering pairwise \"which do you prefer?\" questions")]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start or resume an interactive ranking
    Rank(RankArgs),
    /// Show progress of a saved session without changing it
    Status(StatusArgs),
    /// Write the ranking of a completed session to CSV
    Export(ExportArgs),
    /// Create a default config file at ~/.config/mergerank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with items: one per line, or a JSON array of labels or {"id", "label"} objects
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Session file. Resumed if it exists, created otherwise, saved after every answer.
    #[arg(long)]
    session: Option<PathBuf>,

    /// Shuffle the items before the first comparison
    #[arg(long)]
    shuffle: bool,

    /// Seed for shuffling (from --shuffle or the config), for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,

    /// Refuse "equal" answers so every pair must be ordered
    #[arg(long)]
    forbid_ties: bool,

    /// Keep items with repeated IDs as separate entries
    #[arg(long)]
    allow_duplicates: bool,

    /// Write the final ranking to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/mergerank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct StatusArgs {
    /// Session file to inspect
    #[arg(long)]
    session: PathBuf,

    /// Path to config file (default: ~/.config/mergerank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct ExportArgs {
    /// Completed session file
    #[arg(long)]
    session: PathBuf,

    /// Output CSV path
    #[arg(long)]
    out: PathBuf,

    /// Path to config file (default: ~/.config/mergerank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Load items from --items file and --item inline args, in that order.
fn load_items(args: &RankArgs) -> Result<Vec<Item>> {
    if args.items.is_none() && args.inline_items.is_empty() {
        bail("No items provided. Use --items <file> or --item <name>.");
    }

    // An empty file is allowed and ranks to an empty result.
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items file {}", path.display()))?;
        items = parse::parse_items_from_str(&content).map_err(anyhow::Error::msg)?;
    }

    parse::append_inline_items(&mut items, &args.inline_items).map_err(anyhow::Error::msg)?;

    Ok(items)
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json, cli.verbose);

    let outcome = match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Status(args) => run_status(args),
        Commands::Export(args) => run_export(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default tie policy, session directory, etc.");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        bail(format!("{e:#}"));
    }
}

fn load_config(path: Option<&PathBuf>) -> config::MergerankConfig {
    let config_path = path.cloned().unwrap_or_else(config::config_path);
    config::load_config(&config_path)
}

/// Load a session that must already exist.
fn load_existing(path: &Path) -> Result<RankingSession> {
    store::load_session(path)?
        .with_context(|| format!("No session file at {}", path.display()))
}

fn new_session(args: &RankArgs, cfg: &config::MergerankConfig) -> Result<RankingSession> {
    let mut items = load_items(args)?;

    if args.shuffle || cfg.shuffle.unwrap_or(false) {
        match args.seed {
            Some(seed) => items.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => items.shuffle(&mut rand::rng()),
        }
    }

    let tie_policy = if args.forbid_ties {
        TiePolicy::Forbid
    } else {
        cfg.tie_policy.unwrap_or_default()
    };
    let duplicate_policy = if args.allow_duplicates || cfg.allow_duplicates.unwrap_or(false) {
        DuplicatePolicy::KeepDistinct
    } else {
        DuplicatePolicy::Reject
    };

    let session = RankingSession::new(items, SessionConfig { tie_policy, duplicate_policy })?;
    info!(items = session.items().len(), ?tie_policy, ?duplicate_policy, "Started new ranking");
    Ok(session)
}

fn run_rank(args: RankArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref());
    let session_path = args.session.as_deref().map(|p| config::resolve_session_path(p, &cfg));

    let existing = match &session_path {
        Some(path) => store::load_session(path)?,
        None => None,
    };

    let mut session = match existing {
        Some(session) => {
            if args.items.is_some() || !args.inline_items.is_empty() {
                warn!("Resuming a saved session; the given items are ignored");
            }
            let progress = session.progress();
            println!(
                "Resuming: {} items, {} comparisons done so far.",
                session.items().len(),
                progress.completed,
            );
            session
        }
        None => {
            let session = new_session(&args, &cfg)?;
            if let Some(path) = &session_path {
                store::save_session(path, &session)?;
            }
            session
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let outcome = run_session(&mut session, &mut input, &mut stdout, |s| match &session_path {
        Some(path) => store::save_session(path, s),
        None => Ok(()),
    })?;

    let result = match outcome {
        Outcome::Completed(result) => result,
        Outcome::Suspended | Outcome::InputClosed => {
            match &session_path {
                Some(path) => {
                    store::save_session(path, &session)?;
                    println!(
                        "\nStopped after {} comparisons. Resume with: mergerank rank --session {}",
                        session.comparisons_made(),
                        path.display(),
                    );
                }
                None => println!(
                    "\nStopped after {} comparisons. No --session was given, so progress is not saved.",
                    session.comparisons_made(),
                ),
            }
            return Ok(());
        }
    };

    if let Some(path) = &session_path {
        store::save_session(path, &session)?;
    }

    if args.json {
        output::print_json(&result, session.comparisons_made());
    } else {
        output::print_table(&result, session.comparisons_made());
    }

    if let Some(path) = &args.export {
        export::write_csv(path, &result)?;
        info!(path = %path.display(), "Exported ranking");
    }
    Ok(())
}

fn run_status(args: StatusArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref());
    let path = config::resolve_session_path(&args.session, &cfg);
    let session = load_existing(&path)?;
    output::print_status(&session);
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref());
    let path = config::resolve_session_path(&args.session, &cfg);
    let session = load_existing(&path)?;

    let Some(result) = session.result() else {
        bail(format!(
            "Session at {} is not complete yet ({} comparisons so far). Finish it with `mergerank rank --session`.",
            path.display(),
            session.comparisons_made(),
        ));
    };
    export::write_csv(&args.out, result)?;
    println!("Wrote {} ranked items to {}", result.len(), args.out.display());
    Ok(())
}

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "tabmind")]
#[command(about = "TabMind CLI - cluster open tabs into topical groups", long_about = None)]
struct Cli {
    /// Configuration file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding configuration and workspace state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep workspace state in memory instead of writing it to the data directory
    #[arg(long, global = true)]
    no_save: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one analysis cycle over a tab fixture and print the clusters
    Analyze {
        /// JSON file with the open tabs
        #[arg(long)]
        tabs: PathBuf,
    },
    /// Print the persisted workspace
    Show,
    /// Analyze, then group the fixture tabs by cluster
    Apply {
        #[arg(long)]
        tabs: PathBuf,
    },
    /// Ungroup everything and close tabs opened since the first run
    Revert {
        #[arg(long)]
        tabs: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = commands::Context::new(cli.config.as_deref(), cli.data_dir.as_deref(), cli.no_save)?;

    match cli.command {
        Commands::Analyze { tabs } => commands::analyze::run(&context, &tabs).await?,
        Commands::Show => commands::show::run(&context).await?,
        Commands::Apply { tabs } => commands::apply::run(&context, &tabs).await?,
        Commands::Revert { tabs } => commands::revert::run(&context, &tabs).await?,
    }

    Ok(())
}

mod commands;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panostitch", about = "Equirectangular panorama stitcher")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for compositing (default: one per core)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stitch posed photographs into a panorama
    Stitch(commands::stitch::StitchArgs),
    /// Show image metadata and sphere coverage
    Info(commands::info::InfoArgs),
    /// Print or save a default job manifest
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    match &cli.command {
        Commands::Stitch(args) => commands::stitch::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

//! blockrec CLI
//!
//! Command-line tools for inspecting block-aligned record logs.
//!
//! # Commands
//!
//! - `read` - Print the record at a block offset
//! - `dump` - Print records sequentially, skipping corrupt blocks
//! - `verify` - Check every record and report corruption

mod commands;

use blockrec_core::ReaderConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// blockrec command-line log tools.
#[derive(Parser)]
#[command(name = "blockrec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the record log file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Block size in bytes (0 selects the default of 16)
    #[arg(global = true, short, long, default_value = "0")]
    block_size: u32,

    /// Reject headers declaring more payload bytes than this
    #[arg(global = true, long)]
    max_record_len: Option<u32>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the record at a block offset
    Read {
        /// Block offset of the record
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print records sequentially
    Dump {
        /// Maximum number of records to dump
        #[arg(short, long)]
        limit: Option<usize>,

        /// Start from this block offset
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify record checksums across the whole log
    Verify {
        /// Start from this block offset
        #[arg(short, long, default_value = "0")]
        offset: u64,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ReaderConfig::new().block_size(cli.block_size);
    if let Some(max) = cli.max_record_len {
        config = config.max_record_len(max);
    }

    match cli.command {
        Commands::Read { offset, format } => {
            let path = cli.path.ok_or("Log path required for read")?;
            commands::read::run(&path, config, offset, &format)?;
        }
        Commands::Dump {
            limit,
            offset,
            format,
        } => {
            let path = cli.path.ok_or("Log path required for dump")?;
            commands::dump::run(&path, config, offset, limit, &format)?;
        }
        Commands::Verify { offset } => {
            let path = cli.path.ok_or("Log path required for verify")?;
            commands::verify::run(&path, config, offset)?;
        }
        Commands::Version => {
            println!("blockrec CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("blockrec Core v{}", blockrec_core::VERSION);
        }
    }

    Ok(())
}

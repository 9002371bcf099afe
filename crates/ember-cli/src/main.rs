//! Ember CLI - run particle emitters headless from TOML descriptions

mod commands;
mod file;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, defaults, simulate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Headless runner for Ember particle emitters", long_about = None)]
#[command(version)]
struct Cli {
    /// Log emitter lifecycle events (loops, bursts, expiry)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an emitter for a number of fixed-size frames and report the result
    Simulate {
        /// Path to emitter file
        file: String,

        /// Number of frames to tick
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value = "0.0166667")]
        dt: f64,

        /// Sampler seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Validate an emitter file without running it
    Check {
        /// Path to emitter file
        file: String,
    },

    /// Print the default emitter file
    Defaults,
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Simulate {
            file,
            frames,
            dt,
            seed,
            format,
        } => simulate::run(simulate::SimulateArgs {
            file,
            frames,
            dt,
            seed,
            format,
        }),
        Commands::Check { file } => check::run(&file),
        Commands::Defaults => defaults::run(),
    }
}

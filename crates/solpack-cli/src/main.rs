//! `solpack` binary: argument parsing and logging setup

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use solpack_cli::{commands, IsolateOptions, SolpackConfig};
use solpack_rewrite::IsolationDirection;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "solpack")]
#[command(version, about = "Package and isolate solution directories")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = solpack_cli::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zip a solution directory
    Package {
        /// Solution root
        dir: PathBuf,

        /// Archive file or existing directory (default: a temp file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a solution between isolation schemes
    Isolate {
        /// Solution root
        dir: PathBuf,

        /// Target scheme
        #[arg(long, default_value = "native")]
        direction: IsolationDirection,

        /// Write converted files back in place
        #[arg(long)]
        write: bool,

        /// Archive the converted solution
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the content model of a solution
    Inspect {
        /// Solution root
        dir: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log to stderr so stdout carries only command output
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "solpack=info",
        1 => "solpack=debug",
        _ => "solpack=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config =
        SolpackConfig::resolve(cli.config.as_deref()).context("failed to load configuration")?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Package { dir, output } => {
            commands::package(&config, &dir, output.as_deref(), &mut out)?;
        }
        Commands::Isolate {
            dir,
            direction,
            write,
            output,
        } => {
            let options = IsolateOptions {
                direction,
                write,
                output,
            };
            commands::isolate(&config, &dir, &options, &mut out)?;
        }
        Commands::Inspect { dir, json } => {
            commands::inspect(&config, &dir, json, &mut out)?;
        }
    }

    Ok(())
}

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tsfed::{run_compile, run_fetch, CompileArgs};

#[derive(Parser)]
#[command(name = "tsfed")]
#[command(about = "Bundle the public types of federated TypeScript modules into ambient declarations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every configured entry point into one declaration file
    Compile {
        /// Federation manifest
        #[arg(short, long, default_value = "tsfed.toml", env = "TSFED_MANIFEST")]
        manifest: PathBuf,

        /// Output file path (overrides the manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Program snapshot (overrides the manifest)
        #[arg(short, long)]
        program: Option<PathBuf>,
    },

    /// Download the remote declaration files listed under [remote]
    Fetch {
        /// Federation manifest
        #[arg(short, long, default_value = "tsfed.toml", env = "TSFED_MANIFEST")]
        manifest: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .init();

    match cli.command {
        Commands::Compile {
            manifest,
            output,
            program,
        } => {
            let summary = run_compile(&CompileArgs {
                manifest,
                output,
                program,
            })?;
            println!(
                "✓ Compiled {} module(s) into {}",
                summary.modules,
                summary.output.display()
            );
            Ok(())
        }
        Commands::Fetch { manifest } => {
            let summary = run_fetch(&manifest).await?;
            if summary.failed > 0 {
                bail!("{} remote download(s) failed", summary.failed);
            }
            println!("✓ Fetched {} remote declaration file(s)", summary.succeeded);
            Ok(())
        }
    }
}

//! Retrace CLI
//!
//! Record drawing scripts against the reference canvas, inspect the log and
//! replay ranges of it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod script;

use script::Script;

#[derive(Parser)]
#[command(name = "retrace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record and replay canvas drawing scripts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a script and print the full log as JSON
    Log {
        /// Script file
        script: PathBuf,
    },

    /// Record a script and print its draw and checkpoint indexes
    Indexes {
        /// Script file
        script: PathBuf,
    },

    /// Record a script, then replay a range of its log
    Replay {
        /// Script file
        script: PathBuf,

        /// First entry to replay (log index or checkpoint label)
        #[arg(long)]
        from: Option<String>,

        /// Last entry to replay (log index or checkpoint label)
        #[arg(long)]
        to: Option<String>,

        /// Apply state changes only, skipping calls that paint
        #[arg(long)]
        no_draw: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Log { script } => cmd_log(&script),
        Commands::Indexes { script } => cmd_indexes(&script),
        Commands::Replay {
            script,
            from,
            to,
            no_draw,
        } => cmd_replay(&script, from.as_deref(), to.as_deref(), no_draw),
    }
}

fn cmd_log(path: &std::path::Path) -> Result<()> {
    let recording = Script::load(path)?.record()?;
    let export = recording.context.export();
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn cmd_indexes(path: &std::path::Path) -> Result<()> {
    let recording = Script::load(path)?.record()?;
    let ctx = &recording.context;

    let output = serde_json::json!({
        "draw": ctx.draw_indexes(),
        "checkpoints": ctx.save_state_indexes(),
        "labels": recording.checkpoints,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_replay(
    path: &std::path::Path,
    from: Option<&str>,
    to: Option<&str>,
    no_draw: bool,
) -> Result<()> {
    let mut recording = Script::load(path)?.record()?;
    let from = from.map(|b| recording.bound(b)).transpose()?;
    let to = to.map(|b| recording.bound(b)).transpose()?;

    let ctx = &mut recording.context;
    let painted = ctx.surface().ops().len();

    info!(
        "Replaying {} to {}{}",
        from.map_or_else(|| "start".to_string(), |i| i.to_string()),
        to.map_or_else(|| "end".to_string(), |i| i.to_string()),
        if no_draw { " without drawing" } else { "" }
    );

    let report = ctx
        .rerun(from, to, no_draw)
        .context("Replay failed")?;

    let output = serde_json::json!({
        "report": report,
        "ops": &ctx.surface().ops()[painted..],
        "save_depth": ctx.surface().save_depth(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

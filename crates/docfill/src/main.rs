//! docfill: fill tagged content controls of Word templates.
//!
//! Runs an interactive shell by default, or a one-shot `fields` / `fill`
//! subcommand. The session snapshot registered by a fill is written when
//! the program exits.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use docfill::app::{FILL_COMPLETED, NO_TEMPLATE_SELECTED};
use docfill::launcher::{NoViewer, SystemViewer, Viewer};
use docfill::shell::Shell;
use docfill::{App, Cli, Command, FillOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with shell output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting docfill v{}", env!("CARGO_PKG_VERSION"));
    info!("  Output dir: {:?}", cli.config.output_dir);
    info!("  Snapshot dir: {:?}", cli.config.snapshot_dir);

    if let Some(Command::Fields { template }) = &cli.command {
        for field in docfill_core::discover_fields(template)? {
            println!("{}", field);
        }
        return Ok(());
    }

    let viewer: Box<dyn Viewer> = if cli.config.open {
        Box::new(SystemViewer)
    } else {
        Box::new(NoViewer)
    };
    let mut app = App::new(&cli.config, viewer);

    let result = match cli.command {
        Some(Command::Fill {
            template,
            values,
            output,
        }) => fill_once(&mut app, &template, values, output),
        _ => {
            let stdin = io::stdin();
            Shell::new(stdin.lock(), io::stdout()).run(&mut app)
        }
    };

    // The snapshot is written even when the last command failed
    if let Some(snapshot) = app.shutdown()? {
        println!("Session saved to {}", snapshot.display());
    }
    result
}

fn fill_once(
    app: &mut App,
    template: &std::path::Path,
    values: Vec<(String, String)>,
    output: Option<std::path::PathBuf>,
) -> Result<()> {
    app.select_file(template)?;
    for (tag, value) in values {
        if !app.set_field(&tag, &value) {
            eprintln!("No field '{}' in {}", tag, template.display());
        }
    }

    match app.fill(output).context("Fill failed")? {
        FillOutcome::Filled { output, report } => {
            println!("Wrote {}", output.display());
            if !report.skipped.is_empty() {
                println!("Skipped: {}", report.skipped.join(", "));
            }
            println!("{}", FILL_COMPLETED);
        }
        FillOutcome::NoTemplateSelected => anyhow::bail!(NO_TEMPLATE_SELECTED),
    }
    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line of the docfill binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "docfill", version)]
#[command(about = "Fill tagged content controls of Word templates")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Directory receiving filled documents
    #[arg(long, global = true, default_value = ".", env = "DOCFILL_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Directory receiving the session snapshot written at exit
    #[arg(long, global = true, default_value = ".", env = "DOCFILL_SNAPSHOT_DIR")]
    pub snapshot_dir: PathBuf,

    /// Open each filled document with the system default application
    #[arg(long, global = true, env = "DOCFILL_OPEN")]
    pub open: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the field tags of a template
    Fields {
        template: PathBuf,
    },

    /// Fill a template in one go
    Fill {
        template: PathBuf,

        /// Field value, repeatable
        #[arg(long = "set", value_name = "TAG=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Where to write the filled copy (default: <output-dir>/<name>_filled.docx)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Interactive session (default)
    Shell,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (tag, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=VALUE, got '{}'", s))?;
    if tag.is_empty() {
        return Err(format!("empty tag in '{}'", s));
    }
    Ok((tag.to_string(), value.to_string()))
}

//! CLI argument parsing for the lab runner.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "seclab",
    version,
    about = "Sandboxed terminal labs for practicing secrets-management refactors",
    after_help = "Examples:\n  seclab list\n  seclab run --scenario shared-secrets\n  seclab run --file labs/leaked-ci-token.json\n  seclab script --scenario hardcoded-secrets --input steps.txt --json\n  seclab config --stub",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Config file (defaults to <config dir>/seclab/config.json when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Extra directory of JSON labs; may be repeated
    #[arg(long = "labs", value_name = "DIR", global = true)]
    pub lab_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    List(ListArgs),
    Run(RunArgs),
    Script(ScriptArgs),
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
#[command(about = "List built-in and loaded labs")]
pub struct ListArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Which lab to open: a catalog id or a standalone JSON file.
#[derive(Args, Debug, Default)]
pub struct LabSelection {
    /// Lab id from `seclab list`
    #[arg(long, value_name = "ID", conflicts_with = "file")]
    pub scenario: Option<String>,

    /// Load a single JSON lab file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Open a lab interactively (full-screen on a terminal, line mode otherwise)")]
pub struct RunArgs {
    #[command(flatten)]
    pub lab: LabSelection,
}

#[derive(Parser, Debug)]
#[command(about = "Feed console commands from a file or stdin and print the transcript")]
pub struct ScriptArgs {
    #[command(flatten)]
    pub lab: LabSelection,

    /// Read commands from this file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Emit a JSON report instead of the transcript text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Print the effective config")]
pub struct ConfigArgs {
    /// Print a default config stub instead
    #[arg(long)]
    pub stub: bool,
}

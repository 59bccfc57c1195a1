//! CLI argument parsing for the composer.
//!
//! The CLI only gathers configuration and items; all ordering decisions live
//! in the library so runners can embed the same pipeline.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "scompose",
    version,
    about = "Compose ordered test suites from iteration, shuffle, and profile options",
    after_help = "Examples:\n  scompose compose --items tests.txt --set iterations=3\n  scompose compose --items tests.txt --set shuffle=true --set seed=42 --json\n  scompose compose --items - --config suite.json < tests.txt\n  scompose resolve --profile nightly --profile-dir profiles",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Compose(ComposeArgs),
    Resolve(ResolveArgs),
}

/// Compose command inputs.
#[derive(Parser, Debug)]
#[command(about = "Compose a test suite and print it in run order")]
pub struct ComposeArgs {
    /// File with one test per line, or `-` for stdin
    #[arg(long, value_name = "PATH")]
    pub items: PathBuf,

    /// Flat JSON object of options (iterations, shuffle, seed, profile, ...)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Option override applied after --config; repeatable
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Emit machine-readable JSON output, including stage-chosen options
    #[arg(long)]
    pub json: bool,

    /// Emit debug logs to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Resolve command inputs.
#[derive(Parser, Debug)]
#[command(about = "Resolve a profile and print its scheduled scenarios")]
pub struct ResolveArgs {
    /// Profile document path, profile name, or inline JSON
    #[arg(long, value_name = "PROFILE")]
    pub profile: String,

    /// Directory searched for `<name>.json` when --profile is a name
    #[arg(long, value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Profile within the document to expand
    #[arg(long, value_name = "NAME")]
    pub profile_name: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Emit debug logs to stderr
    #[arg(long)]
    pub verbose: bool,
}

//! Shared argument types for CLI commands.

use std::path::PathBuf;

use clap::Args;

/// Arguments common to any subcommand that reads a single source document.
#[derive(Args, Clone)]
pub struct RenderArgs {
    /// Path to the source document
    pub file: PathBuf,

    /// Output file to write the rendered HTML to; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

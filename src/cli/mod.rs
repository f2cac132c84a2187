//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use args::RenderArgs;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "compono")]
#[command(about = "Parse, validate and render component documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, validate and render a document to HTML
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Print the annotated parse tree, for debugging component grammars
    Ast {
        #[command(flatten)]
        args: RenderArgs,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { args } => commands::render::run(args.file, args.output),
        Commands::Ast { args } => commands::ast::run(args.file, args.output),
    }
}

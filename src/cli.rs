use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI. With no command the layout is generated.
#[derive(Parser, Debug)]
#[command(name = "skel", version, about = "Generate empty project skeletons")]
pub struct Cli {
    /// Directory to generate under (default: `lib`).
    #[arg(short = 'o', long = "base", global = true)]
    pub base: Option<PathBuf>,
    /// Built-in layout name or path to a layout file (default: `flutter`).
    #[arg(short = 'l', long = "layout", global = true)]
    pub layout: Option<String>,
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Print the entries that would be created without touching the filesystem.
    #[arg(short = 'n', long = "dry-run", global = true)]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the layout's directories and empty files.
    Generate,
    /// Show the resolved layout as an indented tree.
    Tree,
    /// List the layouts built into this binary.
    Layouts,
    /// Write the resolved layout's TOML source to a file for editing.
    Export {
        path: PathBuf,
        #[arg(long = "force", default_value_t = false)]
        force: bool,
    },
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}

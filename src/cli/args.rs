//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Group tabular medical records into counted hierarchies and co-occurrence graphs
#[derive(Parser, Debug)]
#[command(name = "cohort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .cohort.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Dataset selection shared by all data commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Dataset file (default: data_file from config)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Group records into a counted hierarchy
    Tree {
        #[command(flatten)]
        input: InputArgs,
        /// Grouping attributes, outermost first (placeholder repeats a real one)
        attrs: Vec<String>,
        /// Emit JSON instead of an indented tree
        #[arg(long)]
        json: bool,
        /// Include member records in JSON output
        #[arg(long, requires = "json")]
        points: bool,
    },

    /// Show the resolved grouping levels
    Levels {
        #[command(flatten)]
        input: InputArgs,
        /// Grouping attributes, outermost first
        attrs: Vec<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show treemap leaf percentages
    Shares {
        #[command(flatten)]
        input: InputArgs,
        /// Grouping attributes, outermost first
        attrs: Vec<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive indicator nodes and co-occurrence links
    Graph {
        #[command(flatten)]
        input: InputArgs,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claude-replay")]
#[command(about = "Reconstruct and inspect Claude Code sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Claude Code data directory [default: $CLAUDE_CONFIG_DIR, config file, ~/.claude]
    #[arg(long, global = true)]
    pub claude_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects, or the sessions of one project
    List {
        /// Project name, encoded directory name, path or directory path
        project: Option<String>,
    },

    /// Print the turns of a session
    Show {
        /// Session id, id prefix, slug or path to a .jsonl file
        query: String,

        /// Print block text in full instead of a one-line preview
        #[arg(long)]
        full: bool,
    },

    /// Print the metadata summary of one session log
    Scan { path: PathBuf },

    /// Line diff of two files
    Diff { old: PathBuf, new: PathBuf },
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Inline `<image inline src="*.svg">` references into generated HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Inline svg references in HTML pages
    #[command(visible_alias = "b")]
    Build {
        /// HTML files or directories. Defaults to the configured root.
        #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// Write results under this directory instead of in place
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Base directory for resolving `src` paths
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,
    },

    /// Report svg references without modifying anything
    #[command(visible_alias = "c")]
    Check {
        /// HTML files or directories. Defaults to the configured root.
        #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// Base directory for resolving `src` paths
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        root: Option<PathBuf>,
    },
}

impl Cli {
    /// `--root` of the active command.
    pub fn root(&self) -> Option<&std::path::Path> {
        match &self.command {
            Commands::Build { root, .. } | Commands::Check { root, .. } => root.as_deref(),
        }
    }

    /// `--output` of the active command, if it has one.
    pub fn output(&self) -> Option<&std::path::Path> {
        match &self.command {
            Commands::Build { output, .. } => output.as_deref(),
            Commands::Check { .. } => None,
        }
    }
}

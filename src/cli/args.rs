//! CLI argument parsing

use crate::config::CliOverrides;
use crate::log::level_from_flags;
use clap::Parser;
use std::path::PathBuf;

/// Export Google-style docstrings from a Python package to Markdown
#[derive(Parser, Debug)]
#[command(name = "docstring2md")]
#[command(about = "Export Google-style docstrings from a Python package to Markdown")]
#[command(version)]
pub struct Args {
    /// Package name, package directory or .py file
    #[arg(short, long)]
    pub package: String,

    /// Write the document to this file instead of standard output
    #[arg(short, long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Build manifest embedded in the dev notes
    #[arg(long, alias = "tml")]
    pub toml_file: Option<PathBuf>,

    /// Task list embedded before the dev notes
    #[arg(long, alias = "td")]
    pub todo_file: Option<PathBuf>,

    /// Mermaid diagram embedded in the dev notes
    #[arg(long, alias = "mmd")]
    pub mermaid_file: Option<PathBuf>,

    /// Add a table of contents
    #[arg(long)]
    pub toc: bool,

    /// Include functions whose name starts with __
    #[arg(long)]
    pub private_def: bool,

    /// Debug logging
    #[arg(long, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// Config file path (default: ./docstring2md.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Values that take precedence over the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output: self.output_file.clone(),
            toml_file: self.toml_file.clone(),
            todo_file: self.todo_file.clone(),
            mermaid_file: self.mermaid_file.clone(),
            toc: self.toc,
            private_def: self.private_def,
            log_level: level_from_flags(self.debug, self.quiet).map(str::to_string),
            logfile: self.logfile.clone(),
        }
    }
}

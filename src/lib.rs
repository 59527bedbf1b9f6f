//! docstring2md - Export Google-style docstrings to Markdown
//!
//! Parses Python sources without running them, rebuilds the signature of
//! every class and function, and renders their docstrings as a single
//! Markdown document with an optional table of contents.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod file;
pub mod log;
pub mod output;
pub mod parser;

// Re-export main types
pub use config::Config;
pub use error::{Error, ExitStatus, Result};

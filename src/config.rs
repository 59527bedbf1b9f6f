use crate::analysis::lister::ModuleLister;
use crate::error::{Error, Result};
use crate::file::Resource;
use crate::output::DocumentOptions;
use crate::parser::{DocstringStyle, ExtractionOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "docstring2md.toml";

/// Levels accepted by `[logging] level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub extraction: ExtractionConfig,
    pub lister: ListerConfig,
    pub logging: LoggingConfig,
}

/// Document settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Emit a table of contents
    pub toc: bool,
    /// Output file, standard output when unset
    pub output: Option<PathBuf>,
    pub toml_file: Option<PathBuf>,
    pub todo_file: Option<PathBuf>,
    pub mermaid_file: Option<PathBuf>,
}

/// Extraction settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Include functions whose name starts with `__`
    pub private_def: bool,
    pub docstring_style: DocstringStyle,
}

/// Package discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListerConfig {
    /// Extra roots searched after the working directory
    pub search_paths: Vec<PathBuf>,
    /// Glob patterns relative to the package root
    pub exclude: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub logfile: Option<PathBuf>,
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![],
            exclude: vec!["tests/**".to_string(), "test_*.py".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            logfile: None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub toml_file: Option<PathBuf>,
    pub todo_file: Option<PathBuf>,
    pub mermaid_file: Option<PathBuf>,
    pub toc: bool,
    pub private_def: bool,
    pub log_level: Option<String>,
    pub logfile: Option<PathBuf>,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or return defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if cli.output.is_some() {
            self.document.output = cli.output;
        }
        if cli.toml_file.is_some() {
            self.document.toml_file = cli.toml_file;
        }
        if cli.todo_file.is_some() {
            self.document.todo_file = cli.todo_file;
        }
        if cli.mermaid_file.is_some() {
            self.document.mermaid_file = cli.mermaid_file;
        }
        if cli.toc {
            self.document.toc = true;
        }
        if cli.private_def {
            self.extraction.private_def = true;
        }
        if let Some(level) = cli.log_level {
            self.logging.level = level;
        }
        if cli.logfile.is_some() {
            self.logging.logfile = cli.logfile;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::config_validation(format!(
                "unknown log level: {}",
                self.logging.level
            )));
        }

        for pattern in &self.lister.exclude {
            glob::Pattern::new(pattern)?;
        }

        if let (Some(output), Some(toml)) = (&self.document.output, &self.document.toml_file) {
            if output == toml {
                return Err(Error::config_validation(
                    "output file would overwrite the toml file",
                ));
            }
        }

        Ok(())
    }

    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions {
            include_module_docstring: false,
            include_private_members: self.extraction.private_def,
            docstring_style: self.extraction.docstring_style,
        }
    }

    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            toml: Resource::set_path(self.document.toml_file.as_deref()),
            uml: Resource::set_path(self.document.mermaid_file.as_deref()),
            todo: Resource::set_path(self.document.todo_file.as_deref()),
            output: Resource::set_path(self.document.output.as_deref()),
            toc: self.document.toc,
        }
    }

    pub fn lister(&self) -> Result<ModuleLister> {
        ModuleLister::new(&self.lister.search_paths).with_exclude(&self.lister.exclude)
    }
}

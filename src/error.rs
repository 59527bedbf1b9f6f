use std::path::PathBuf;
use thiserror::Error;

/// docstring2md error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    #[error("Cannot create {path}: {source}")]
    CannotCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error writing to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

/// Result type alias for docstring2md operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a module-not-found error
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Error::ModuleNotFound(name.into())
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Status surfaced to the caller for this error
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Error::ModuleNotFound(_) => ExitStatus::OsFile,
            Error::CannotCreate { .. } => ExitStatus::CantCreat,
            Error::Write { .. } | Error::Io(_) | Error::WalkDir(_) | Error::Parser(_) => {
                ExitStatus::IoErr
            }
            Error::ConfigParse(_) | Error::ConfigValidation(_) | Error::GlobPattern(_) => {
                ExitStatus::Config
            }
        }
    }
}

/// Closed set of statuses returned by a run (sysexits values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitStatus {
    /// Success
    Ok = 0,
    /// Module or package not found
    OsFile = 72,
    /// Output file cannot be created
    CantCreat = 73,
    /// Output file cannot be written
    IoErr = 74,
    /// Configuration error
    Config = 78,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == ExitStatus::Ok
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

// Resource accessor: one input or output file of a run

use crate::error::{Error, ExitStatus, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A file path with its existence checked once, at creation.
///
/// `status` is `Ok` for an existing path, `OsFile` for a missing one and
/// `CantCreat` when no path was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub path: Option<PathBuf>,
    pub exists: bool,
    pub status: ExitStatus,
}

impl Resource {
    pub fn set_path<P: AsRef<Path>>(path: Option<P>) -> Self {
        match path {
            None => Self {
                path: None,
                exists: false,
                status: ExitStatus::CantCreat,
            },
            Some(path) => {
                let path = path.as_ref().to_path_buf();
                let exists = path.exists();
                Self {
                    path: Some(path),
                    exists,
                    status: if exists {
                        ExitStatus::Ok
                    } else {
                        ExitStatus::OsFile
                    },
                }
            }
        }
    }

    /// Whole file content, empty when no path was given
    pub fn read(&self) -> Result<String> {
        let Some(path) = &self.path else {
            return Ok(String::new());
        };
        std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
        })
    }

    /// Create or truncate the file and write `data` to it
    pub fn try_write(&self, data: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Err(Error::CannotCreate {
                path: PathBuf::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no output path"),
            });
        };
        let mut file = File::create(path).map_err(|source| Error::CannotCreate {
            path: path.clone(),
            source,
        })?;
        file.write_all(data.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
        Ok(())
    }

    /// Write `data` and report the outcome as a status
    pub fn write(&self, data: &str) -> ExitStatus {
        match self.try_write(data) {
            Ok(()) => {
                info!("new document has been created: {}", self.absolute());
                ExitStatus::Ok
            }
            Err(e) => {
                error!("{}", e);
                e.exit_status()
            }
        }
    }

    /// Absolute form of the path, empty when no path was given
    pub fn absolute(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| std::path::absolute(p).ok())
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

// Module lister: resolves a target to a source file or a package file list

use crate::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const INIT_FILE: &str = "__init__.py";

/// What a target name refers to on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single source file
    Module(PathBuf),
    /// A package directory and its source files
    Package(PackageLayout),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    /// Package directory
    pub root: PathBuf,
    /// Root `__init__.py`, absent for namespace packages
    pub init: Option<PathBuf>,
    /// Every source file to extract, in document order
    pub files: Vec<PathBuf>,
}

/// Finds packages under an explicit list of search roots
#[derive(Debug, Clone, Default)]
pub struct ModuleLister {
    search_paths: Vec<PathBuf>,
    exclude: Vec<Pattern>,
}

impl ModuleLister {
    /// Create a lister searching the current directory, then `search_paths`
    pub fn new(search_paths: &[PathBuf]) -> Self {
        let mut paths = vec![PathBuf::from(".")];
        paths.extend(search_paths.iter().cloned());
        Self {
            search_paths: paths,
            exclude: Vec::new(),
        }
    }

    /// Skip files whose path relative to the package root matches a pattern
    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self> {
        self.exclude = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Resolve a target: a `.py` file, a package directory or a dotted
    /// package name
    pub fn resolve(&self, target: &str) -> Result<Target> {
        if target.ends_with(".py") {
            return self
                .find(Path::new(target), Path::is_file)
                .map(Target::Module)
                .ok_or_else(|| Error::module_not_found(target));
        }

        let direct = Path::new(target);
        if let Some(dir) = self.find(direct, Path::is_dir) {
            return self.layout(&dir).map(Target::Package);
        }

        let relative: PathBuf = target.split('.').collect();
        if let Some(dir) = self.find(&relative, Path::is_dir) {
            return self.layout(&dir).map(Target::Package);
        }
        if let Some(file) = self.find(&relative.with_extension("py"), Path::is_file) {
            debug!("{} is a plain module: {}", target, file.display());
            return Ok(Target::Module(file));
        }

        Err(Error::module_not_found(target))
    }

    /// First search root under which `relative` satisfies `check`
    fn find(&self, relative: &Path, check: fn(&Path) -> bool) -> Option<PathBuf> {
        if relative.is_absolute() {
            return check(relative).then(|| relative.to_path_buf());
        }
        self.search_paths
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| check(candidate))
    }

    fn layout(&self, root: &Path) -> Result<PackageLayout> {
        let init = root.join(INIT_FILE);
        let init = init.is_file().then_some(init);
        if init.is_none() {
            info!("{} has no {}, reading it as a namespace package", root.display(), INIT_FILE);
        }
        let files = self.list_package(root)?;
        Ok(PackageLayout {
            root: root.to_path_buf(),
            init,
            files,
        })
    }

    /// Source files of the package at `root`: `__init__.py` first, then the
    /// other modules sorted by name, then each sub-package the same way
    pub fn list_package(&self, root: &Path) -> Result<Vec<PathBuf>> {
        self.list_dir(root, root)
    }

    fn list_dir(&self, package_root: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut init = None;
        let mut modules = Vec::new();
        let mut packages = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy();

            if self.is_excluded(package_root, path) {
                debug!("excluded: {}", path.display());
                continue;
            }
            if entry.file_type().is_dir() {
                if name.starts_with('.') || name == "__pycache__" {
                    continue;
                }
                if path.join(INIT_FILE).is_file() {
                    packages.push(path.to_path_buf());
                }
            } else if path.extension().is_some_and(|ext| ext == "py") {
                if name == INIT_FILE {
                    init = Some(path.to_path_buf());
                } else if !name.starts_with("__") {
                    modules.push(path.to_path_buf());
                }
            }
        }

        let mut files: Vec<PathBuf> = init.into_iter().chain(modules).collect();
        for package in packages {
            files.extend(self.list_dir(package_root, &package)?);
        }
        Ok(files)
    }

    fn is_excluded(&self, package_root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(package_root).unwrap_or(path);
        self.exclude.iter().any(|pattern| pattern.matches_path(relative))
    }
}

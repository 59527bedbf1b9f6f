// Module reader: runs extraction over a single file or a whole package

use crate::analysis::lister::{ModuleLister, Target};
use crate::error::Result;
use crate::file::Resource;
use crate::parser::python::path_to_module_name;
use crate::parser::{extract, ExtractionOptions, SourceNode};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Documentation source for one target name
#[derive(Debug, Clone)]
pub struct ModuleReader {
    name: String,
    target: Target,
    options: ExtractionOptions,
}

impl ModuleReader {
    /// Resolve `name` with `lister`.
    ///
    /// Fails with `ModuleNotFound` when the name matches no file or package.
    pub fn open(name: &str, lister: &ModuleLister, options: ExtractionOptions) -> Result<Self> {
        let target = lister.resolve(name)?;
        debug!("{} resolved to {:?}", name, target);
        Ok(Self {
            name: name.to_string(),
            target,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for a single source file, false for a package
    pub fn is_module(&self) -> bool {
        matches!(self.target, Target::Module(_))
    }

    /// Extract every node of the target in document order.
    ///
    /// A single file keeps its module docstring as the first node. Package
    /// files are extracted without module docstrings; see
    /// [`ModuleReader::pkg_main_docstring`].
    pub fn read(&self) -> Result<Vec<SourceNode>> {
        info!("start reading {}", self.name);
        match &self.target {
            Target::Module(path) => self.extract_file(path, true),
            Target::Package(layout) => {
                info!(
                    "{} is a package with {} source files",
                    self.name,
                    layout.files.len()
                );
                let per_file = layout
                    .files
                    .par_iter()
                    .map(|path| self.extract_file(path, false))
                    .collect::<Result<Vec<_>>>()?;
                Ok(per_file.into_iter().flatten().collect())
            }
        }
    }

    /// Docstring node of the package `__init__.py`.
    ///
    /// `None` for single files, which carry it as their first node, and for
    /// namespace packages.
    pub fn pkg_main_docstring(&self) -> Result<Option<SourceNode>> {
        let Target::Package(layout) = &self.target else {
            return Ok(None);
        };
        let Some(init) = &layout.init else {
            return Ok(None);
        };
        let nodes = self.extract_file(init, true)?;
        Ok(nodes.into_iter().next().filter(SourceNode::is_module))
    }

    fn extract_file(&self, path: &Path, module_docstring: bool) -> Result<Vec<SourceNode>> {
        debug!("extract {} ({})", path_to_module_name(path), path.display());
        let source = Resource::set_path(Some(path)).read()?;
        let options = ExtractionOptions {
            include_module_docstring: module_docstring,
            ..self.options
        };
        extract(&source, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::DocstringStyle;
    use std::fs;
    use tempfile::TempDir;

    fn create_package() -> TempDir {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(pkg.join("sub")).unwrap();
        fs::write(
            pkg.join("__init__.py"),
            "\"\"\"Pkg:\"\"\"\n\ndef init_helper():\n    pass\n",
        )
        .unwrap();
        fs::write(
            pkg.join("b.py"),
            "\"\"\"Module b.\"\"\"\nclass Foo:\n    \"\"\"doc\"\"\"\n\n    def bar(self):\n        \"\"\"doc2\"\"\"\n",
        )
        .unwrap();
        fs::write(pkg.join("a.py"), "def first():\n    pass\n").unwrap();
        fs::write(pkg.join("sub").join("__init__.py"), "").unwrap();
        fs::write(pkg.join("sub").join("deep.py"), "def deep():\n    pass\n").unwrap();
        dir
    }

    fn open(dir: &TempDir, name: &str) -> ModuleReader {
        let lister = ModuleLister::new(&[dir.path().to_path_buf()]);
        ModuleReader::open(name, &lister, ExtractionOptions::default()).unwrap()
    }

    #[test]
    fn test_read_package_in_lister_order() {
        let dir = create_package();
        let reader = open(&dir, "pkg");
        assert!(!reader.is_module());

        let nodes = reader.read().unwrap();
        let titles: Vec<&str> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["init_helper()", "first()", "Foo()", "Foo.bar()", "deep()"]
        );
        assert!(nodes.iter().all(|n| !n.is_module()));
    }

    #[test]
    fn test_pkg_main_docstring() {
        let dir = create_package();
        let reader = open(&dir, "pkg");
        let main = reader.pkg_main_docstring().unwrap().unwrap();
        assert!(main.is_module());
        assert_eq!(main.get_summary(), "# Pkg:");
    }

    #[test]
    fn test_single_file() {
        let dir = create_package();
        let path = dir.path().join("pkg").join("b.py");
        let reader = open(&dir, path.to_str().unwrap());
        assert!(reader.is_module());
        assert!(reader.pkg_main_docstring().unwrap().is_none());

        let nodes = reader.read().unwrap();
        assert!(nodes[0].is_module());
        assert_eq!(nodes[0].docstring, "Module b.");
        assert_eq!(nodes[1].title, "Foo()");
    }

    #[test]
    fn test_namespace_package_has_no_main_docstring() {
        let dir = TempDir::new().unwrap();
        let ns = dir.path().join("ns");
        fs::create_dir_all(&ns).unwrap();
        fs::write(ns.join("mod.py"), "def f():\n    pass\n").unwrap();

        let reader = open(&dir, "ns");
        assert!(reader.pkg_main_docstring().unwrap().is_none());
        assert_eq!(reader.read().unwrap().len(), 1);
    }

    #[test]
    fn test_options_are_forwarded() {
        let dir = create_package();
        let lister = ModuleLister::new(&[dir.path().to_path_buf()]);
        let options = ExtractionOptions {
            docstring_style: DocstringStyle::Quote,
            ..Default::default()
        };
        let reader = ModuleReader::open("pkg.sub", &lister, options).unwrap();
        let nodes = reader.read().unwrap();
        assert_eq!(
            nodes[0].kind,
            crate::parser::NodeKind::Function(DocstringStyle::Quote)
        );
    }

    #[test]
    fn test_unknown_module() {
        let lister = ModuleLister::new(&[]);
        let err = ModuleReader::open("oups", &lister, ExtractionOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ModuleNotFound(_)));
        assert_eq!(err.to_string(), "No module named 'oups'");
    }
}

// Document assembler: joins the summary, auxiliary files and nodes

use crate::analysis::reader::ModuleReader;
use crate::error::{ExitStatus, Result};
use crate::file::Resource;
use crate::parser::SourceNode;
use tracing::{info, warn};

pub const DEV_HEAD: &str = "# Dev notes";
pub const DEV_TOML: &str = "## TOML file:";
pub const DEV_UML: &str = "## UML Diagram:";
pub const DEV_OBJ: &str = "## Objects:";

/// Output settings and auxiliary files of one document
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Build manifest embedded as a `toml` block
    pub toml: Resource,
    /// Diagram embedded as a `mermaid` block
    pub uml: Resource,
    /// Task list embedded before the dev notes
    pub todo: Resource,
    /// Destination; standard output when it has no path
    pub output: Resource,
    pub toc: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        let none = Resource::set_path(None::<&str>);
        Self {
            toml: none.clone(),
            uml: none.clone(),
            todo: none.clone(),
            output: none,
            toc: false,
        }
    }
}

pub struct DocumentAssembler {
    options: DocumentOptions,
}

impl DocumentAssembler {
    pub fn new(options: DocumentOptions) -> Self {
        Self { options }
    }

    /// Read the target and assemble its document
    pub fn import_module(&self, reader: &ModuleReader) -> Result<String> {
        let mut nodes = reader.read()?;
        let summary = if reader.is_module() {
            match nodes.first() {
                Some(first) if first.is_module() => Some(nodes.remove(0)),
                _ => None,
            }
        } else {
            reader.pkg_main_docstring()?
        };
        info!("{}: {} objects", reader.name(), nodes.len());
        self.assemble(summary.as_ref(), &nodes)
    }

    /// Join every part in document order with newlines
    pub fn assemble(&self, summary: Option<&SourceNode>, nodes: &[SourceNode]) -> Result<String> {
        let mut output: Vec<String> = Vec::new();

        if let Some(summary) = summary {
            output.push(summary.get_summary());
        }
        if let Some(todo) = read_auxiliary("todo", &self.options.todo)? {
            output.push(todo);
        }
        output.push(DEV_HEAD.to_string());
        if let Some(toml) = read_auxiliary("toml", &self.options.toml)? {
            output.push(DEV_TOML.to_string());
            output.push(fenced("toml", &toml));
        }
        if let Some(uml) = read_auxiliary("uml", &self.options.uml)? {
            output.push(DEV_UML.to_string());
            output.push(fenced("mermaid", &uml));
        }
        output.push(format!("{}\n", DEV_OBJ));

        let objects = nodes.iter().filter(|node| !node.is_module());
        if self.options.toc {
            output.extend(objects.clone().filter_map(SourceNode::get_toc_entry));
        }
        output.extend(objects.map(SourceNode::get_summary));

        Ok(output.join("\n"))
    }

    /// Print the document, or write it to the output file
    pub fn write_doc(&self, doc: &str) -> ExitStatus {
        if self.options.output.path.is_none() {
            println!("{}", doc);
            return ExitStatus::Ok;
        }
        self.options.output.write(doc)
    }
}

fn fenced(lang: &str, text: &str) -> String {
    format!("```{}\n{}\n```", lang, text.trim_end_matches('\n'))
}

/// Content of an optional auxiliary file; a missing file is skipped
fn read_auxiliary(label: &str, resource: &Resource) -> Result<Option<String>> {
    let Some(path) = &resource.path else {
        return Ok(None);
    };
    if !resource.exists {
        warn!("{} file not found, skipped: {}", label, path.display());
        return Ok(None);
    }
    resource.read().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DocstringStyle, NodeKind};
    use std::fs;
    use tempfile::TempDir;

    fn sample_nodes() -> Vec<SourceNode> {
        vec![
            SourceNode::new(NodeKind::Class, "Foo()", "class Foo():", Some("doc".into()), 1),
            SourceNode::new(
                NodeKind::Function(DocstringStyle::Pre),
                "Foo.bar()",
                "def Foo.bar(self):",
                Some("doc2".into()),
                2,
            ),
        ]
    }

    fn position(doc: &str, needle: &str) -> usize {
        doc.find(needle)
            .unwrap_or_else(|| panic!("{:?} not found in:\n{}", needle, doc))
    }

    #[test]
    fn test_minimal_document() {
        let assembler = DocumentAssembler::new(DocumentOptions::default());
        let doc = assembler.assemble(None, &[]).unwrap();
        assert_eq!(doc, "# Dev notes\n## Objects:\n");
    }

    #[test]
    fn test_document_order_with_toc() {
        let summary = SourceNode::module(Some("Pkg:".into()));
        let assembler = DocumentAssembler::new(DocumentOptions {
            toc: true,
            ..Default::default()
        });
        let doc = assembler.assemble(Some(&summary), &sample_nodes()).unwrap();

        let order = [
            "# Pkg:",
            "# Dev notes",
            "## Objects:",
            "[Foo()](#foo)<br />",
            "[Foo.bar()](#foobar)<br />",
            "### Foo()",
            "#### Foo.bar()",
        ];
        let positions: Vec<usize> = order.iter().map(|n| position(&doc, n)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", doc);
        assert!(doc.starts_with("# Pkg:\n# Dev notes\n## Objects:\n\n[Foo()]"));
    }

    #[test]
    fn test_no_toc_by_default() {
        let assembler = DocumentAssembler::new(DocumentOptions::default());
        let doc = assembler.assemble(None, &sample_nodes()).unwrap();
        assert!(!doc.contains("<br />\n["));
        assert!(!doc.contains("](#foo)"));
    }

    #[test]
    fn test_auxiliary_files() {
        let dir = TempDir::new().unwrap();
        let toml = dir.path().join("pyproject.toml");
        let uml = dir.path().join("classes.mmd");
        let todo = dir.path().join("TODO.md");
        fs::write(&toml, "[project]\nname = \"pkg\"\n").unwrap();
        fs::write(&uml, "classDiagram\n  Foo <|-- Bar\n").unwrap();
        fs::write(&todo, "# TODO\n- more tests").unwrap();

        let assembler = DocumentAssembler::new(DocumentOptions {
            toml: Resource::set_path(Some(&toml)),
            uml: Resource::set_path(Some(&uml)),
            todo: Resource::set_path(Some(&todo)),
            ..Default::default()
        });
        let doc = assembler.assemble(None, &[]).unwrap();
        assert_eq!(
            doc,
            "# TODO\n- more tests\n# Dev notes\n## TOML file:\n```toml\n[project]\nname = \"pkg\"\n```\n## UML Diagram:\n```mermaid\nclassDiagram\n  Foo <|-- Bar\n```\n## Objects:\n"
        );
    }

    #[test]
    fn test_missing_auxiliary_file_is_skipped() {
        let assembler = DocumentAssembler::new(DocumentOptions {
            toml: Resource::set_path(Some("/definitely/not/here.toml")),
            ..Default::default()
        });
        let doc = assembler.assemble(None, &[]).unwrap();
        assert!(!doc.contains(DEV_TOML));
    }

    #[test]
    fn test_module_nodes_are_not_objects() {
        let mut nodes = sample_nodes();
        nodes.insert(0, SourceNode::module(Some("Stray:".into())));
        let assembler = DocumentAssembler::new(DocumentOptions {
            toc: true,
            ..Default::default()
        });
        let doc = assembler.assemble(None, &nodes).unwrap();
        assert!(!doc.contains("Stray"));
    }

    #[test]
    fn test_write_doc_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("README.md");
        let assembler = DocumentAssembler::new(DocumentOptions {
            output: Resource::set_path(Some(&out)),
            ..Default::default()
        });
        assert_eq!(assembler.write_doc("# Doc"), ExitStatus::Ok);
        assert_eq!(fs::read_to_string(&out).unwrap(), "# Doc");
    }

    #[test]
    fn test_write_doc_to_stdout() {
        let assembler = DocumentAssembler::new(DocumentOptions::default());
        assert_eq!(assembler.write_doc("# Doc"), ExitStatus::Ok);
    }
}

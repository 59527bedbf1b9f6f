// Parser module: Python syntax trees to documentation nodes

pub mod node;
pub mod python;
pub mod values;
pub mod visitor;

pub use node::{DocstringStyle, NodeKind, NodeLink, SourceNode};
pub use python::PythonParser;
pub use visitor::{extract, ExtractionOptions, ObjVisitor};

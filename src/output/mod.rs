// Output generation module: Markdown text transforms and document assembly

pub mod document;
pub mod transform;

pub use document::{DocumentAssembler, DocumentOptions};
pub use transform::{apply_chain, Transform};

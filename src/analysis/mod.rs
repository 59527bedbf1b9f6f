// Analysis module: package discovery and per-target extraction

pub mod lister;
pub mod reader;

pub use lister::{ModuleLister, PackageLayout, Target};
pub use reader::ModuleReader;

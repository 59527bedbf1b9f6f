//! CLI module for docstring2md

mod args;

pub use args::Args;

use crate::analysis::ModuleReader;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{ExitStatus, Result};
use crate::output::DocumentAssembler;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error, info};

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(status) => status.into(),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            e.exit_status().into()
        }
    }
}

/// Load the configuration, then read, assemble and write the document
pub fn execute(args: Args) -> Result<ExitStatus> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    config.merge_cli(args.overrides());
    config.validate()?;

    crate::log::init(&config.logging.level, config.logging.logfile.as_deref())?;
    debug!("arguments: {:?}", args);

    let start = Instant::now();
    let lister = config.lister()?;
    let reader = ModuleReader::open(&args.package, &lister, config.extraction_options())?;
    let assembler = DocumentAssembler::new(config.document_options());
    let doc = assembler.import_module(&reader)?;
    let status = assembler.write_doc(&doc);
    info!("elapsed time: {:.3} s", start.elapsed().as_secs_f64());

    Ok(status)
}

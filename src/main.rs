use std::process::ExitCode;

fn main() -> ExitCode {
    docstring2md::cli::run()
}

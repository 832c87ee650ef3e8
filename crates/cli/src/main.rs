//! pkgfs command-line entry point

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(error) = logging::init_tracing(cli.level.into(), cli.json) {
        eprintln!("{error:?}");
        return ExitCode::FAILURE;
    }

    let span = tracing::info_span!("pkgfs", correlation_id = %logging::correlation_id());
    let _guard = span.enter();

    match commands::execute(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:?}");
            ExitCode::FAILURE
        }
    }
}

//! Command implementations for the pkgfs CLI

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use pkgfs_core::Config;
use pkgfs_tools::{Capability, Context, ToolRegistry};
use tracing::{debug, instrument};

use crate::cli::{Cli, Commands};

fn load_config(cli: &Cli) -> pkgfs_core::Result<Config> {
    match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)?;
            config.apply_env()?;
            Ok(config)
        }
        None => Config::discover(),
    }
}

fn write_line(line: impl std::fmt::Display) -> miette::Result<()> {
    writeln!(io::stdout().lock(), "{line}")
        .map_err(|e| miette::miette!("Failed to write output: {e}"))
}

/// Run the parsed command line.
#[instrument(skip(cli), fields(command = ?cli.command))]
pub fn execute(cli: Cli) -> miette::Result<ExitCode> {
    let config = load_config(&cli)?;
    let registry = ToolRegistry::shared(&config);
    let mut ctx = Context::with_registry(Arc::new(config), registry);

    if let Some(dir) = &cli.directory {
        ctx.change_dir(dir)?;
    }

    match cli.command {
        Commands::Fetch { url, output, cache } => {
            let path = ctx.download(&url, output.as_deref(), cache)?;
            write_line(path.display())?;
        }
        Commands::Md5 { file, expect } => match expect {
            Some(expected) => {
                if !ctx.verify_digest(&file, &expected)? {
                    write_line(format!("{}: MISMATCH", file.display()))?;
                    return Ok(ExitCode::FAILURE);
                }
                write_line(format!("{}: OK", file.display()))?;
            }
            None => write_line(ctx.compute_digest(&file)?)?,
        },
        Commands::Ls { dir } => {
            let mut listing = ctx.list_directory(&dir)?;
            for entry in listing.by_ref() {
                write_line(entry.to_string_lossy())?;
            }
            if !listing.close() {
                debug!(dir = ?dir, "Listing command reported failure");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Run { command } => {
            if !ctx.execute(&command) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Tools => {
            for capability in Capability::ALL {
                match ctx.resolve(capability) {
                    Some(tool) => write_line(format!(
                        "{capability}: {} ({})",
                        tool.name,
                        tool.invocation_prefix()?
                    ))?,
                    None => write_line(format!("{capability}: none"))?,
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

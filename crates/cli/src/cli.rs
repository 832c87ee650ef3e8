use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "pkgfs")]
#[command(about = "Fetch, hash, list and run through the host's external tools")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,

    #[arg(
        short = 'C',
        long,
        global = true,
        help = "Change to this directory before running the command"
    )]
    pub directory: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file to use")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Download a URL and print the local path")]
    Fetch {
        url: String,
        #[arg(short = 'o', long, help = "Local file name")]
        output: Option<PathBuf>,
        #[arg(long, help = "Skip the transfer if the remote file is unchanged")]
        cache: bool,
    },
    #[command(about = "Print the MD5 digest of a file")]
    Md5 {
        file: PathBuf,
        #[arg(long, help = "Verify against this digest instead of printing")]
        expect: Option<String>,
    },
    #[command(about = "List directory entries")]
    Ls {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    #[command(about = "Run a shell command")]
    Run { command: String },
    #[command(about = "Show which tool serves each capability and how it is invoked")]
    Tools,
}

pub fn parse() -> Cli {
    Cli::parse()
}

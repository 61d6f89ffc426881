use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;
use crate::config::DEFAULT_CONFIG_FILE_NAME;
use crate::directory::SortMode;

/// Browse a flat media path listing as a directory tree.
///
/// Without `--command` an interactive shell is started on stdin.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Listing file, one `<path> <date> GMT <size>` entry per line
    pub listing: Option<String>,

    /// Directory to start in
    #[clap(long, short)]
    pub path: Option<String>,

    #[clap(long, short, value_enum)]
    pub sort: Option<SortMode>,

    /// YAML file with default `listing`, `path` and `sort` values
    #[clap(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Shell command to run instead of reading stdin, may be repeated
    #[clap(long = "command", short = 'c')]
    pub commands: Vec<String>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

use snafu::prelude::*;

use crate::application::ApplicationError;
use crate::application::application::MissingListingSnafu;
use crate::cli::Cli;
use crate::config::Defaults;
use crate::directory::SortMode;

const ROOT_PATH: &str = "/";

/// Settings of one run, with command line flags taking precedence over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub listing: String,
    pub path: String,
    pub sort: SortMode,
    pub commands: Vec<String>,
}

impl RuntimeConfig {
    pub fn resolve(cli: Cli, defaults: Defaults) -> Result<Self, ApplicationError> {
        let listing = cli.listing.or(defaults.listing).context(MissingListingSnafu)?;

        Ok(Self {
            listing,
            path: cli
                .path
                .or(defaults.path)
                .unwrap_or_else(|| ROOT_PATH.to_string()),
            sort: cli.sort.or(defaults.sort).unwrap_or_default(),
            commands: cli.commands,
        })
    }
}

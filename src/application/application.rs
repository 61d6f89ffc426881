use std::io;

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::config::{ConfigCreationError, Defaults};
use crate::directory::{DirectoryError, DirectoryState};
use crate::shell::{Session, ShellError};

pub struct Application;

impl Application {
    pub fn run(cli: Cli) -> Result<(), ApplicationError> {
        let defaults = Defaults::read(&cli.config).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", defaults);

        let runtime_config = RuntimeConfig::resolve(cli, defaults)?;
        debug!("Resolved runtime config: {:?}", runtime_config);

        let state = DirectoryState::new(
            runtime_config.listing.as_str(),
            &runtime_config.path,
            runtime_config.sort,
        )
        .context(DirectoryStateSnafu)?;

        let mut session = Session::new(state, io::stdout().lock());
        if runtime_config.commands.is_empty() {
            session
                .run_interactive(io::stdin().lock())
                .context(ShellSnafu)?;
        } else {
            session
                .run_script(runtime_config.commands.iter().map(String::as_str))
                .context(ShellSnafu)?;
        }
        info!(
            "Leaving shell at {} in '{}'",
            session.state().path(),
            session.state().source_id()
        );

        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigCreationError },
    #[snafu(display("No listing given on the command line or in the config file"))]
    MissingListing,
    #[snafu(display("Critical failure encountered while opening the listing"))]
    DirectoryStateError { source: DirectoryError },
    #[snafu(display("Critical failure encountered while running commands"))]
    ShellError { source: ShellError },
}

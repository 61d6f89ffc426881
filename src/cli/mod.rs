mod cli;
mod log_level;

pub use cli::Cli;
pub use log_level::LogLevel;

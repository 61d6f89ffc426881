mod defaults;

pub use defaults::{ConfigCreationError, DEFAULT_CONFIG_FILE_NAME, Defaults};

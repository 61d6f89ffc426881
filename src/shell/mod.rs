//! Line-oriented command shell over a [`DirectoryState`](crate::directory::DirectoryState).

mod command;
mod session;

pub use command::{ShellCommand, ShellError};
pub use session::Session;

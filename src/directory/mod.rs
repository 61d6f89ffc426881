//! Stateful navigation over a parsed listing.

mod data;
mod error;
mod state;

pub use data::{Direction, ItemKind, SortMode};
pub use error::DirectoryError;
pub use state::DirectoryState;

//! In-memory directory hierarchy built from a path listing.
//!
//! [`DirectoryTree`] holds folders and files in listing order,
//! [`ListingSet`] projects the direct children of one folder into sorted views.

mod projection;
mod tree;

pub use projection::ListingSet;
pub use tree::{DirectoryTree, TreeNode, UnresolvedPathError};

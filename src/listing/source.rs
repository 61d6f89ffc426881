use std::fs;
use std::io;

use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Read capability for the backing text of a listing.
pub trait ListingSource {
    /// Returns the whole text behind `source_id`.
    fn read_all(&self, source_id: &str) -> io::Result<String>;
}

/// Reads listings from the local filesystem, treating the source id as a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ListingSource for FileSource {
    fn read_all(&self, source_id: &str) -> io::Result<String> {
        debug!("Reading listing file: {}", source_id.best_effort_path_display());
        let contents = fs::read_to_string(source_id)?;
        debug!("Successfully read listing file: {} bytes", contents.len());
        Ok(contents)
    }
}

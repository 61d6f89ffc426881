//! Ingestion of the flat path listing.
//!
//! A listing is plain text with one `<path> <date> GMT <size>` entry per line.
//! This module reads it through a [`ListingSource`] and turns the matching
//! lines into [`PathRecord`]s.

mod record;
mod source;

pub use record::{PathRecord, parse_records, sort_newest_first};
pub use source::{FileSource, ListingSource};

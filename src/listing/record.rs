use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::{Captures, Regex};
use tracing::debug;

/// Format of the date part that follows the weekday, e.g. `22 Oct 2013 15:48:42`.
const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M:%S";

static LISTING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<path>.*?\.(?:264|flv|m2t|m2ts|mov|mp4|m4v|sdp|ts|aac|m4a|wav|bmp|gif|jpg|jpeg|",
        r"tif|tiff|png|m3u8|m3u|pls|jspf|xspf|mpg|mpeg|mp1|mp2|mp3|m1v|m1a|m2a|mpa|mpv)) ",
        r"(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun), ",
        r"(?P<stamp>\d{2} (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \d{4} \d{2}:\d{2}:\d{2}) ",
        r"GMT \d+(?:\r?\n|$)",
    ))
    .unwrap_or_else(|e| panic!("Listing line pattern does not compile: {e}"))
});

/// One file entry of the listing: its path split into segments and the time it was modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    segments: Vec<String>,
    modified: DateTime<Utc>,
}

impl PathRecord {
    pub fn new(segments: Vec<String>, modified: DateTime<Utc>) -> Self {
        Self { segments, modified }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    fn from_captures(captures: &Captures) -> Option<Self> {
        let path = captures.name("path")?.as_str();
        let stamp = captures.name("stamp")?.as_str();

        let modified = match NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
            Ok(naive) => naive.and_utc(),
            Err(e) => {
                debug!("Skipping '{}': unparsable date '{}': {}", path, stamp, e);
                return None;
            }
        };

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if segments.is_empty() {
            debug!("Skipping '{}': no path segments", path);
            return None;
        }

        Some(Self { segments, modified })
    }
}

/// Extracts every recognised entry of `text` in listing order.
///
/// Lines that do not look like `<media path> <Day>, DD Mon YYYY HH:MM:SS GMT <size>`
/// are skipped without an error.
pub fn parse_records(text: &str) -> Vec<PathRecord> {
    let records = LISTING_LINE
        .captures_iter(text)
        .filter_map(|captures| PathRecord::from_captures(&captures))
        .collect::<Vec<_>>();
    debug!("Parsed {} path records", records.len());
    records
}

/// Orders records most recently modified first. Equal timestamps keep their listing order.
pub fn sort_newest_first(records: &mut [PathRecord]) {
    records.sort_by_key(|record| std::cmp::Reverse(record.modified()));
}

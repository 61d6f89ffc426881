use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::directory::error::{
    InvalidOperationSnafu, InvalidPathSnafu, InvalidSourceSnafu, MissingSubdirectorySnafu,
    NothingToSearchSnafu, SourceUnavailableSnafu,
};
use crate::directory::{DirectoryError, Direction, ItemKind, SortMode};
use crate::filesystem::{DirectoryTree, ListingSet};
use crate::listing::{FileSource, ListingSource, PathRecord, parse_records, sort_newest_first};

const SOURCE_SUFFIX: &str = ".txt";

/// Current location inside a listing plus the cached views of that location.
///
/// The listing is read lazily: nothing touches the source until the first call that
/// needs the tree. After that the parsed records stay cached until [`reload`] or
/// [`set_source`] asks for a fresh read.
///
/// Every mutating call validates first and assigns afterwards, so a failed call
/// leaves path, sort mode and listings exactly as they were.
///
/// [`reload`]: DirectoryState::reload
/// [`set_source`]: DirectoryState::set_source
#[derive(Debug)]
pub struct DirectoryState<S = FileSource> {
    source: S,
    source_id: String,
    segments: Vec<String>,
    sort_mode: SortMode,
    records: Option<Vec<PathRecord>>,
    tree: DirectoryTree,
    listings: Option<ListingSet>,
}

impl DirectoryState<FileSource> {
    /// Creates a state over a listing file on disk.
    pub fn new(
        source_id: impl Into<String>,
        path: &str,
        sort_mode: SortMode,
    ) -> Result<Self, DirectoryError> {
        Self::with_source(FileSource, source_id, path, sort_mode)
    }
}

impl<S: ListingSource> DirectoryState<S> {
    /// Creates a state reading its listing through `source`.
    ///
    /// Only the shape of `source_id` is checked here; `path` is resolved on first use.
    pub fn with_source(
        source: S,
        source_id: impl Into<String>,
        path: &str,
        sort_mode: SortMode,
    ) -> Result<Self, DirectoryError> {
        let source_id = source_id.into();
        validate_source_id(&source_id)?;

        Ok(Self {
            source,
            source_id,
            segments: split_path(path),
            sort_mode,
            records: None,
            tree: DirectoryTree::default(),
            listings: None,
        })
    }

    /// The current directory as an absolute path, `/` for the root.
    pub fn path(&self) -> String {
        join_path(&self.segments)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Returns the items of `kind` in the current directory.
    ///
    /// With a non-empty `search_term` only names containing it, ignoring case, are
    /// returned. Searching a kind that has no items at all is an error rather than
    /// an empty result.
    pub fn get_items(
        &mut self,
        kind: ItemKind,
        search_term: Option<&str>,
    ) -> Result<Vec<String>, DirectoryError> {
        if self.listings.is_none() {
            self.navigate_to(self.segments.clone())?;
        }
        let items = self
            .listings
            .as_ref()
            .map(|listings| listings.get(kind))
            .unwrap_or_default();

        let Some(term) = search_term.filter(|term| !term.is_empty()) else {
            return Ok(items.to_vec());
        };
        ensure!(!items.is_empty(), NothingToSearchSnafu { kind });

        let needle = term.to_lowercase();
        Ok(items
            .iter()
            .filter(|item| item.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    /// Moves to the absolute `path`.
    pub fn set_path(&mut self, path: &str) -> Result<(), DirectoryError> {
        self.navigate_to(split_path(path))
    }

    /// Switches the ordering, rebuilding the tree if the listing is already loaded.
    pub fn set_sort_mode(&mut self, sort_mode: SortMode) -> Result<(), DirectoryError> {
        if let Some(records) = &self.records {
            let tree = build_tree(records, sort_mode);
            let listings = self.project_current(&tree, sort_mode)?;
            self.tree = tree;
            self.listings = listings;
        }
        debug!("Sort mode set to {}", sort_mode);
        self.sort_mode = sort_mode;
        Ok(())
    }

    /// Points the state at another listing.
    ///
    /// An already loaded listing is replaced right away and the current path must
    /// exist in the new one; otherwise the new source is read on first use.
    pub fn set_source(&mut self, source_id: impl Into<String>) -> Result<(), DirectoryError> {
        let source_id = source_id.into();
        validate_source_id(&source_id)?;

        if self.records.is_some() {
            let records = read_records(&self.source, &source_id)?;
            self.replace_records(records)?;
        }
        self.source_id = source_id;
        Ok(())
    }

    /// Reads the current source again and rebuilds everything derived from it.
    pub fn reload(&mut self) -> Result<(), DirectoryError> {
        let records = read_records(&self.source, &self.source_id)?;
        self.replace_records(records)
    }

    /// Steps into `subdirectory` or out to the parent directory.
    pub fn step(
        &mut self,
        direction: Direction,
        subdirectory: Option<&str>,
    ) -> Result<(), DirectoryError> {
        let mut segments = self.segments.clone();
        match direction {
            Direction::In => {
                let subdirectory = subdirectory
                    .map(split_path)
                    .filter(|segments| !segments.is_empty())
                    .context(MissingSubdirectorySnafu)?;
                segments.extend(subdirectory);
            }
            Direction::Out => {
                ensure!(segments.pop().is_some(), InvalidOperationSnafu);
            }
        }
        self.navigate_to(segments)
    }

    fn ensure_loaded(&mut self) -> Result<(), DirectoryError> {
        if self.records.is_none() {
            let records = read_records(&self.source, &self.source_id)?;
            self.tree = build_tree(&records, self.sort_mode);
            if self.tree.is_empty() {
                warn!("Listing '{}' contains no recognised entries", self.source_id);
            }
            self.records = Some(records);
        }
        Ok(())
    }

    fn navigate_to(&mut self, segments: Vec<String>) -> Result<(), DirectoryError> {
        self.ensure_loaded()?;
        let folder = self.tree.navigate(&segments).context(InvalidPathSnafu {
            path: join_path(&segments),
        })?;
        self.listings = Some(ListingSet::project(folder, self.sort_mode));
        self.segments = segments;
        debug!("Current directory is now {}", self.path());
        Ok(())
    }

    fn replace_records(&mut self, records: Vec<PathRecord>) -> Result<(), DirectoryError> {
        let tree = build_tree(&records, self.sort_mode);
        let listings = self.project_current(&tree, self.sort_mode)?;
        self.records = Some(records);
        self.tree = tree;
        self.listings = listings;
        Ok(())
    }

    /// Projects the current path of `tree`, if the current path has been resolved before.
    fn project_current(
        &self,
        tree: &DirectoryTree,
        sort_mode: SortMode,
    ) -> Result<Option<ListingSet>, DirectoryError> {
        if self.listings.is_none() {
            return Ok(None);
        }
        let folder = tree
            .navigate(&self.segments)
            .context(InvalidPathSnafu { path: self.path() })?;
        Ok(Some(ListingSet::project(folder, sort_mode)))
    }
}

fn validate_source_id(source_id: &str) -> Result<(), DirectoryError> {
    ensure!(
        source_id.ends_with(SOURCE_SUFFIX),
        InvalidSourceSnafu { source_id }
    );
    Ok(())
}

fn read_records(
    source: &impl ListingSource,
    source_id: &str,
) -> Result<Vec<PathRecord>, DirectoryError> {
    let text = source
        .read_all(source_id)
        .context(SourceUnavailableSnafu { source_id })?;
    let records = parse_records(&text);
    info!("Loaded {} entries from '{}'", records.len(), source_id);
    Ok(records)
}

fn build_tree(records: &[PathRecord], sort_mode: SortMode) -> DirectoryTree {
    match sort_mode {
        SortMode::Alphanumeric => DirectoryTree::build(records),
        SortMode::DateModified => {
            let mut records = records.to_vec();
            sort_newest_first(&mut records);
            DirectoryTree::build(&records)
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io;
    use std::io::Write;
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    const LISTING: &str = "\
shares/win7/Artbeats/1920x1080-Artbeats-3-v2.mp4 Tue, 22 Oct 2013 15:48:42 GMT 100
shares/win7/Artbeats/test_clip.mov Wed, 23 Oct 2013 09:12:00 GMT 200
shares/win7/Artbeats/withMusic/song.mp3 Mon, 21 Oct 2013 08:00:00 GMT 300
shares/win7/Audio/b_track.wav Fri, 01 Nov 2013 12:00:00 GMT 10
shares/win7/Audio/A_track.wav Thu, 31 Oct 2013 12:00:00 GMT 10
shares/win7/Audio/temp/c_track.aac Sat, 02 Nov 2013 12:00:00 GMT 10
shares/linux/clip.ts Sun, 03 Nov 2013 12:00:00 GMT 10
notes/readme.txt Sun, 03 Nov 2013 12:00:00 GMT 10
";

    /// In-memory listings that count how often they are read.
    #[derive(Debug, Clone, Default)]
    struct MemorySource {
        listings: Rc<RefCell<HashMap<String, String>>>,
        reads: Rc<Cell<usize>>,
    }

    impl MemorySource {
        fn with(source_id: &str, text: &str) -> Self {
            let source = Self::default();
            source.put(source_id, text);
            source
        }

        fn put(&self, source_id: &str, text: &str) {
            self.listings
                .borrow_mut()
                .insert(source_id.to_string(), text.to_string());
        }

        fn reads(&self) -> usize {
            self.reads.get()
        }
    }

    impl ListingSource for MemorySource {
        fn read_all(&self, source_id: &str) -> io::Result<String> {
            self.reads.set(self.reads.get() + 1);
            self.listings
                .borrow()
                .get(source_id)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, source_id.to_string()))
        }
    }

    #[fixture]
    fn source() -> MemorySource {
        MemorySource::with("paths.txt", LISTING)
    }

    fn state_at(source: &MemorySource, path: &str) -> DirectoryState<MemorySource> {
        DirectoryState::with_source(source.clone(), "paths.txt", path, SortMode::Alphanumeric)
            .unwrap()
    }

    fn items(state: &mut DirectoryState<MemorySource>, kind: ItemKind) -> Vec<String> {
        state.get_items(kind, None).unwrap()
    }

    #[rstest]
    fn listing_is_read_lazily_and_once(source: MemorySource) {
        let mut state = state_at(&source, "/");
        assert_eq!(source.reads(), 0);

        assert_eq!(items(&mut state, ItemKind::All), ["shares"]);
        assert_eq!(source.reads(), 1);

        state.set_path("/shares/win7").unwrap();
        state.set_sort_mode(SortMode::DateModified).unwrap();
        state.step(Direction::Out, None).unwrap();
        items(&mut state, ItemKind::Files);
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn single_line_scenario() {
        let source = MemorySource::with(
            "paths.txt",
            "shares/a/x.mp4 Tue, 22 Oct 2013 15:48:42 GMT 100\n",
        );
        let mut state = state_at(&source, "/");

        assert_eq!(items(&mut state, ItemKind::Folders), ["shares"]);
        assert!(items(&mut state, ItemKind::Files).is_empty());

        state.set_path("/shares/a").unwrap();
        assert_eq!(items(&mut state, ItemKind::Files), ["x.mp4"]);
        assert!(items(&mut state, ItemKind::Folders).is_empty());
    }

    #[rstest]
    fn listings_partition_current_directory(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7/Audio");

        assert_eq!(
            items(&mut state, ItemKind::All),
            ["A_track.wav", "b_track.wav", "temp"]
        );
        assert_eq!(
            items(&mut state, ItemKind::Files),
            ["A_track.wav", "b_track.wav"]
        );
        assert_eq!(items(&mut state, ItemKind::Folders), ["temp"]);
    }

    #[rstest]
    fn date_modified_orders_newest_first(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7");
        assert_eq!(items(&mut state, ItemKind::All), ["Artbeats", "Audio"]);

        state.set_sort_mode(SortMode::DateModified).unwrap();
        assert_eq!(state.sort_mode(), SortMode::DateModified);
        assert_eq!(items(&mut state, ItemKind::All), ["Audio", "Artbeats"]);

        state.set_path("/shares/win7/Audio").unwrap();
        assert_eq!(
            items(&mut state, ItemKind::All),
            ["temp", "b_track.wav", "A_track.wav"]
        );

        state.set_sort_mode(SortMode::Alphanumeric).unwrap();
        assert_eq!(
            items(&mut state, ItemKind::All),
            ["A_track.wav", "b_track.wav", "temp"]
        );
    }

    #[test]
    fn date_modified_places_folder_by_its_newest_record() {
        let source = MemorySource::with(
            "paths.txt",
            "\
A/new.mp4 Fri, 01 Nov 2013 12:00:00 GMT 1
B/mid.mp4 Thu, 31 Oct 2013 12:00:00 GMT 1
A/old.mp4 Tue, 01 Jan 2013 12:00:00 GMT 1
",
        );
        let mut state = state_at(&source, "/");

        state.set_sort_mode(SortMode::DateModified).unwrap();
        assert_eq!(items(&mut state, ItemKind::All), ["A", "B"]);

        state.set_path("/A").unwrap();
        assert_eq!(items(&mut state, ItemKind::Files), ["new.mp4", "old.mp4"]);
    }

    #[test]
    fn date_modified_reorders_folders_listed_oldest_first() {
        let source = MemorySource::with(
            "paths.txt",
            "\
A/old.mp4 Tue, 01 Jan 2013 12:00:00 GMT 1
B/mid.mp4 Thu, 31 Oct 2013 12:00:00 GMT 1
A/new.mp4 Fri, 01 Nov 2013 12:00:00 GMT 1
C/oldest.mp4 Mon, 31 Dec 2012 12:00:00 GMT 1
",
        );
        let mut state = state_at(&source, "/");
        state.set_sort_mode(SortMode::DateModified).unwrap();

        assert_eq!(items(&mut state, ItemKind::All), ["A", "B", "C"]);
    }

    #[rstest]
    fn sort_mode_before_loading_is_applied_on_first_use(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7");
        state.set_sort_mode(SortMode::DateModified).unwrap();
        assert_eq!(source.reads(), 0);
        assert_eq!(items(&mut state, ItemKind::All), ["Audio", "Artbeats"]);
    }

    #[rstest]
    #[case(ItemKind::Files, "MP4", vec!["1920x1080-Artbeats-3-v2.mp4"])]
    #[case(ItemKind::All, "test", vec!["test_clip.mov"])]
    #[case(ItemKind::All, "ARTBEATS", vec!["1920x1080-Artbeats-3-v2.mp4"])]
    #[case(ItemKind::Folders, "music", vec!["withMusic"])]
    #[case(ItemKind::Files, "flac", vec![])]
    fn search_filters_ignoring_case(
        source: MemorySource,
        #[case] kind: ItemKind,
        #[case] term: &str,
        #[case] expected: Vec<&str>,
    ) {
        let mut state = state_at(&source, "/shares/win7/Artbeats");
        assert_eq!(state.get_items(kind, Some(term)).unwrap(), expected);
    }

    #[rstest]
    fn search_does_not_touch_cached_listings(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7/Artbeats");
        state.get_items(ItemKind::All, Some("mov")).unwrap();
        assert_eq!(items(&mut state, ItemKind::All).len(), 3);
    }

    #[rstest]
    fn empty_search_term_returns_everything(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7");
        assert_eq!(
            state.get_items(ItemKind::Folders, Some("")).unwrap(),
            ["Artbeats", "Audio"]
        );
    }

    #[rstest]
    fn searching_an_empty_kind_fails(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7");

        let result = state.get_items(ItemKind::Files, Some("mp4"));

        assert!(matches!(
            result,
            Err(DirectoryError::NothingToSearch {
                kind: ItemKind::Files
            })
        ));
        assert!(items(&mut state, ItemKind::Files).is_empty());
    }

    #[rstest]
    #[case("/nonexistent")]
    #[case("/shares/win7/Artbeats/test_clip.mov")]
    #[case("/shares/win7/Artbeats/test_clip.mov/inner")]
    fn failed_set_path_keeps_previous_state(source: MemorySource, #[case] path: &str) {
        let mut state = state_at(&source, "/shares/win7");
        let before = items(&mut state, ItemKind::All);

        let result = state.set_path(path);

        assert!(matches!(
            result,
            Err(DirectoryError::InvalidPath { path: failed, .. }) if failed == path
        ));
        assert_eq!(state.path(), "/shares/win7");
        assert_eq!(items(&mut state, ItemKind::All), before);
    }

    #[rstest]
    #[case("shares/win7/", "/shares/win7")]
    #[case("//shares//linux", "/shares/linux")]
    #[case("", "/")]
    #[case("/", "/")]
    fn set_path_normalizes_slashes(
        source: MemorySource,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let mut state = state_at(&source, "/");
        state.set_path(path).unwrap();
        assert_eq!(state.path(), expected);
    }

    #[rstest]
    fn step_in_then_out_round_trips(source: MemorySource) {
        let mut state = state_at(&source, "/shares/win7");
        let before = items(&mut state, ItemKind::All);

        state.step(Direction::In, Some("Audio")).unwrap();
        assert_eq!(state.path(), "/shares/win7/Audio");
        assert_eq!(items(&mut state, ItemKind::Folders), ["temp"]);

        state.step(Direction::Out, None).unwrap();
        assert_eq!(state.path(), "/shares/win7");
        assert_eq!(items(&mut state, ItemKind::All), before);
    }

    #[rstest]
    fn step_in_accepts_nested_names(source: MemorySource) {
        let mut state = state_at(&source, "/shares");
        state.step(Direction::In, Some("win7/Audio")).unwrap();
        assert_eq!(state.path(), "/shares/win7/Audio");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("/"))]
    fn step_in_requires_subdirectory(source: MemorySource, #[case] subdirectory: Option<&str>) {
        let mut state = state_at(&source, "/shares");
        assert!(matches!(
            state.step(Direction::In, subdirectory),
            Err(DirectoryError::MissingSubdirectory)
        ));
        assert_eq!(state.path(), "/shares");
    }

    #[rstest]
    fn step_in_to_missing_folder_keeps_path(source: MemorySource) {
        let mut state = state_at(&source, "/shares");
        assert!(matches!(
            state.step(Direction::In, Some("win8")),
            Err(DirectoryError::InvalidPath { .. })
        ));
        assert_eq!(state.path(), "/shares");
        assert_eq!(items(&mut state, ItemKind::All), ["linux", "win7"]);
    }

    #[rstest]
    fn step_out_of_root_is_invalid(source: MemorySource) {
        let mut state = state_at(&source, "/");
        assert!(matches!(
            state.step(Direction::Out, None),
            Err(DirectoryError::InvalidOperation)
        ));
        assert_eq!(state.path(), "/");
    }

    #[rstest]
    #[case("paths.csv")]
    #[case("")]
    #[case("paths.txt.bak")]
    fn constructor_rejects_bad_source_ids(source: MemorySource, #[case] source_id: &str) {
        let result = DirectoryState::with_source(source, source_id, "/", SortMode::Alphanumeric);
        assert!(matches!(result, Err(DirectoryError::InvalidSource { .. })));
    }

    #[test]
    fn unreadable_source_is_unavailable() {
        let source = MemorySource::default();
        let mut state = state_at(&source, "/");

        let result = state.get_items(ItemKind::All, None);

        assert!(matches!(
            result,
            Err(DirectoryError::SourceUnavailable { source_id, .. }) if source_id == "paths.txt"
        ));
    }

    #[rstest]
    fn invalid_initial_path_can_be_recovered(source: MemorySource) {
        let mut state = state_at(&source, "/missing");

        assert!(matches!(
            state.get_items(ItemKind::All, None),
            Err(DirectoryError::InvalidPath { .. })
        ));
        assert_eq!(state.path(), "/missing");

        state.set_path("/shares").unwrap();
        assert_eq!(items(&mut state, ItemKind::All), ["linux", "win7"]);
        assert_eq!(source.reads(), 1);
    }

    #[rstest]
    fn reload_picks_up_changed_listing(source: MemorySource) {
        let mut state = state_at(&source, "/shares/linux");
        assert_eq!(items(&mut state, ItemKind::Files), ["clip.ts"]);

        source.put(
            "paths.txt",
            &format!("{LISTING}shares/linux/extra.mkv.mp4 Mon, 04 Nov 2013 12:00:00 GMT 1\n"),
        );
        state.reload().unwrap();

        assert_eq!(source.reads(), 2);
        assert_eq!(
            items(&mut state, ItemKind::Files),
            ["clip.ts", "extra.mkv.mp4"]
        );
    }

    #[rstest]
    fn set_source_replaces_loaded_listing(source: MemorySource) {
        source.put(
            "other.txt",
            "shares/linux/other.mp4 Tue, 22 Oct 2013 15:48:42 GMT 100\n",
        );
        let mut state = state_at(&source, "/shares/linux");
        items(&mut state, ItemKind::All);

        state.set_source("other.txt").unwrap();

        assert_eq!(state.source_id(), "other.txt");
        assert_eq!(items(&mut state, ItemKind::Files), ["other.mp4"]);
    }

    #[rstest]
    fn failed_set_source_keeps_previous_listing(source: MemorySource) {
        source.put(
            "elsewhere.txt",
            "media/x.mp4 Tue, 22 Oct 2013 15:48:42 GMT 100\n",
        );
        let mut state = state_at(&source, "/shares/linux");
        items(&mut state, ItemKind::All);

        assert!(matches!(
            state.set_source("missing.txt"),
            Err(DirectoryError::SourceUnavailable { .. })
        ));
        assert!(matches!(
            state.set_source("elsewhere.txt"),
            Err(DirectoryError::InvalidPath { .. })
        ));
        assert!(matches!(
            state.set_source("elsewhere.csv"),
            Err(DirectoryError::InvalidSource { .. })
        ));

        assert_eq!(state.source_id(), "paths.txt");
        assert_eq!(items(&mut state, ItemKind::Files), ["clip.ts"]);
    }

    #[rstest]
    fn set_source_before_loading_stays_lazy(source: MemorySource) {
        let mut state = state_at(&source, "/");
        state.set_source("missing.txt").unwrap();
        assert_eq!(source.reads(), 0);
        assert!(matches!(
            state.get_items(ItemKind::All, None),
            Err(DirectoryError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn reads_listing_from_disk() {
        let mut temp_file = NamedTempFile::with_suffix(".txt").expect("Failed to create temp file");
        temp_file
            .write_all(LISTING.as_bytes())
            .expect("Failed to write to temp file");
        let path = temp_file.path().to_str().expect("Temp path is not UTF-8");

        let mut state = DirectoryState::new(path, "/shares/win7/Artbeats", SortMode::Alphanumeric)
            .expect("Failed to create directory state");

        assert_eq!(
            state.get_items(ItemKind::Folders, None).unwrap(),
            ["withMusic"]
        );
    }
}

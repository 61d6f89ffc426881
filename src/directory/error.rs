use snafu::Snafu;

use crate::directory::ItemKind;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DirectoryError {
    #[snafu(display("Invalid {} '{}'", argument, value))]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
    #[snafu(display("Invalid sort mode '{}'", value))]
    InvalidSortMode { value: String },
    #[snafu(display("Invalid listing source '{}', expected a .txt file", source_id))]
    InvalidSource { source_id: String },
    #[snafu(display("Invalid path '{}'", path))]
    InvalidPath {
        path: String,
        source: crate::filesystem::UnresolvedPathError,
    },
    #[snafu(display("Missing or invalid subdirectory for stepping in"))]
    MissingSubdirectory,
    #[snafu(display("Listing source '{}' is unavailable", source_id))]
    SourceUnavailable {
        source_id: String,
        source: std::io::Error,
    },
    #[snafu(display("No {} to search", kind.to_string().to_lowercase()))]
    NothingToSearch { kind: ItemKind },
    #[snafu(display("Cannot step out of the root directory"))]
    InvalidOperation,
}

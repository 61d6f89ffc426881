use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::directory::SortMode;
use crate::ext::BestEffortPathExt;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "mediadir.yaml";

/// Values read from the optional YAML defaults file.
///
/// ```yaml
/// listing: file_paths.txt
/// path: /shares/win7
/// sort: Date Modified
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub listing: Option<String>,
    pub path: Option<String>,
    pub sort: Option<SortMode>,
}

impl Defaults {
    /// Reads `path`, falling back to empty defaults when the file does not exist.
    pub fn read(path: &Path) -> Result<Self, ConfigCreationError> {
        debug!("Opening config file: {}", path.best_effort_path_display());
        match fs::read_to_string(path) {
            Ok(contents) => {
                debug!("Successfully read config file: {} bytes", contents.len());
                contents.as_str().try_into()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).context(ReadSnafu {
                file_path: path.best_effort_path_display(),
            }),
        }
    }

    fn string_entry(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Option<String>, ConfigCreationError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|value| Some(value.to_string()))
                .context(NotAStringSnafu { key }),
        }
    }
}

impl TryFrom<&str> for Defaults {
    type Error = ConfigCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let sort = match Self::string_entry(top_level, "sort")? {
            None => None,
            Some(value) => match value.parse::<SortMode>() {
                Ok(sort) => Some(sort),
                Err(_) => return UnknownSortModeSnafu { value }.fail(),
            },
        };

        Ok(Defaults {
            listing: Self::string_entry(top_level, "listing")?,
            path: Self::string_entry(top_level, "path")?,
            sort,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigCreationError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config entry '{}' should be a string", key))]
    NotAString { key: &'static str },
    #[snafu(display("Config entry 'sort' has unknown value '{}'", value))]
    UnknownSortMode { value: String },
}

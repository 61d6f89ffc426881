use std::str::FromStr;

use clap::ValueEnum;
use derive_more::Display;

use crate::directory::DirectoryError;

/// Ordering applied to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
pub enum SortMode {
    /// Case-insensitive by name.
    #[default]
    #[display("Alphanumeric")]
    Alphanumeric,
    /// Most recently modified entries first.
    #[display("Date Modified")]
    DateModified,
}

impl FromStr for SortMode {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alphanumeric" => Ok(SortMode::Alphanumeric),
            "Date Modified" => Ok(SortMode::DateModified),
            _ => Err(DirectoryError::InvalidSortMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Which of the listings of the current directory to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ItemKind {
    #[default]
    All,
    Files,
    Folders,
}

impl FromStr for ItemKind {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(ItemKind::All),
            "Files" => Ok(ItemKind::Files),
            "Folders" => Ok(ItemKind::Folders),
            _ => Err(DirectoryError::InvalidArgument {
                argument: "item kind",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    In,
    Out,
}

impl FromStr for Direction {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In" => Ok(Direction::In),
            "Out" => Ok(Direction::Out),
            _ => Err(DirectoryError::InvalidArgument {
                argument: "direction",
                value: s.to_string(),
            }),
        }
    }
}

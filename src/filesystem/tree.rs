use hashlink::LinkedHashMap;
use hashlink::linked_hash_map::Entry;
use snafu::Snafu;
use tracing::{debug, warn};

use crate::listing::PathRecord;

/// A node of the directory hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Folder(DirectoryTree),
    File,
}

/// Folder contents keyed by name. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTree {
    children: LinkedHashMap<String, TreeNode>,
}

impl DirectoryTree {
    /// Builds a fresh tree from `records`, inserting them in the given order.
    ///
    /// Records whose parent folders collide with an existing file are skipped.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a PathRecord>) -> Self {
        let tree = records.into_iter().fold(Self::default(), |mut tree, record| {
            if let Err(e) = tree.insert_file(record.segments()) {
                warn!("Skipping '{}': {}", e.path, e);
            }
            tree
        });
        debug!("Built directory tree with {} top level items", tree.len());
        tree
    }

    /// Inserts a file at `segments`, creating the intermediate folders.
    ///
    /// A file always wins over a folder of the same name at the last segment and
    /// keeps that entry's position.
    pub fn insert_file(&mut self, segments: &[String]) -> Result<(), InsertIntoFileError> {
        let Some((file_name, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut branch = self;
        for segment in parents {
            // An existing folder keeps its position.
            let node = match branch.children.entry(segment.clone()) {
                Entry::Occupied(occupied) => occupied.into_mut(),
                Entry::Vacant(vacant) => {
                    vacant.insert(TreeNode::Folder(DirectoryTree::default()))
                }
            };
            branch = match node {
                TreeNode::Folder(folder) => folder,
                TreeNode::File => {
                    return Err(InsertIntoFileError {
                        path: segments.join("/"),
                    });
                }
            };
        }

        match branch.children.get_mut(file_name) {
            Some(existing) => *existing = TreeNode::File,
            None => {
                branch.children.insert(file_name.clone(), TreeNode::File);
            }
        }
        Ok(())
    }

    /// Walks `segments` from this folder and returns the folder they point at.
    ///
    /// An empty slice resolves to `self`. Missing names and names that denote files
    /// both fail to resolve.
    pub fn navigate(&self, segments: &[String]) -> Result<&DirectoryTree, UnresolvedPathError> {
        let mut branch = self;
        for segment in segments {
            branch = match branch.children.get(segment) {
                Some(TreeNode::Folder(folder)) => folder,
                Some(TreeNode::File) | None => {
                    debug!("Segment '{}' does not name a folder", segment);
                    return Err(UnresolvedPathError {
                        path: format!("/{}", segments.join("/")),
                    });
                }
            };
        }
        Ok(branch)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TreeNode)> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Path '{}' could not be resolved", path))]
pub struct UnresolvedPathError {
    pub path: String,
}

#[derive(Debug, Snafu)]
#[snafu(display("Cannot insert a file below a file"))]
pub struct InsertIntoFileError {
    pub path: String,
}
